//! Resource listing engine for the Hydrodash admin dashboard.
//!
//! Turns an untrusted query map into a safe, deterministic, paginated
//! listing of one resource kind:
//! - [`ListingRequest`] — the raw request, parsed once at the boundary
//! - [`FilterSpec`] / [`SortSpec`] — validated predicates and ordering
//! - [`ListingQueryEngine`] — compiles both into a parameterised [`CompiledQuery`]
//! - [`PageWindow`] / [`paginate`] — page clamping and navigation links
//! - [`ArchivePartitioner`] — moves records between the active and archived partitions
//! - [`ListingService`] — the per-resource façade the HTTP layer calls
//!
//! The engine never executes SQL itself; a [`RecordStore`] does.

pub mod archive;
pub mod error;
pub mod filter;
pub mod paginator;
pub mod query;
pub mod request;
pub mod response;
pub mod service;
pub mod sort;
pub mod store;
pub mod whitelist;

pub use archive::{ArchiveOutcome, ArchivePartitioner, ArchiveTransition};
pub use error::{ListingError, ListingResult, StoreError, StoreResult};
pub use filter::{ArchivePartition, FilterChoice, FilterSpec};
pub use paginator::{paginate, LinkBuilder, Page, PageLink, PageWindow};
pub use query::{escape_like, CompiledQuery, ListingQueryEngine, SqlParam, CASEFOLD_FN};
pub use request::{ListingConfig, ListingRequest};
pub use response::{ErrorBody, ListingResponse, PaginationMeta};
pub use service::{ListingService, API_PREFIX};
pub use sort::{resolve_sort, SortSpec};
pub use store::RecordStore;
pub use whitelist::{validate_direction, validate_sort_column};
