//! Resource model for the Hydrodash listings.
//!
//! Declares, per resource kind, everything the listing engine is allowed to
//! put into a query:
//! - [`ResourceSchema`] — source table, scope conditions, searchable fields
//! - [`SortColumn`] — the column whitelist; each public key maps to a static expression
//! - [`EnumFilter`] — filter parameters and their token vocabularies
//! - [`UpdateValidator`] — field-level validation for admin edits
//!
//! No user-supplied text ever becomes SQL; only the static expressions
//! declared here do.

mod schema;
mod validate;

pub use schema::{Condition, EnumFilter, FilterOption, ResourceSchema, SortColumn, DEVICES, USERS};
pub use validate::{is_valid_email, UpdateValidator, MAX_ADDRESS_LEN, MAX_NAME_LEN};
