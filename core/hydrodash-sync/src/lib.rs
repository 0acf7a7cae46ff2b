//! Dashboard-side synchronization for Hydrodash listings.
//!
//! Keeps the rendered table consistent with the user's latest intent:
//! - [`QuerySynchronizer`] — pure state machine: debounce, sequence tokens,
//!   stale-response discard
//! - [`ListingTransport`] — how requests reach the server; [`ListingClient`]
//!   is the HTTP implementation
//! - [`spawn_driver`] — tokio task that runs the state machine against a
//!   transport and publishes a [`SyncView`]

pub mod driver;
pub mod error;
pub mod query;
pub mod synchronizer;
pub mod transport;

pub use driver::{spawn_driver, SyncHandle, SyncView};
pub use error::{ClientError, ClientResult};
pub use query::ListingQuery;
pub use synchronizer::{Dispatch, QuerySynchronizer, ResponseOutcome, SyncConfig, SyncIntent, SyncPhase};
pub use transport::{ClientConfig, ListingClient, ListingTransport};
