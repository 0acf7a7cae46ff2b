//! Error types for the listing layer.

use hydrodash_types::{FieldErrors, RecordId, ResourceKind};
use thiserror::Error;

/// Result type for record store calls.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for listing, archive and update operations.
pub type ListingResult<T> = Result<T, ListingError>;

/// Errors reported by a [`crate::RecordStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write collided with a unique index.
    #[error("unique constraint violated on {field}")]
    UniqueViolation { field: String },

    /// The backing store failed.
    #[error("record store error: {0}")]
    Backend(String),
}

/// Errors that can occur in listing operations.
///
/// Invalid sort columns, directions and filter tokens are not errors: they
/// resolve to defaults and are echoed back.
#[derive(Debug, Error)]
pub enum ListingError {
    /// No record with that identity exists.
    #[error("{} {id} not found", .kind.singular())]
    RecordNotFound { kind: ResourceKind, id: RecordId },

    /// The update payload failed field validation.
    #[error("validation failed on {} field(s)", .0.len())]
    ValidationFailed(FieldErrors),

    /// An update addressed to one resource kind reached another's service.
    #[error("expected a {expected} update, got a {found} update")]
    WrongResource {
        expected: ResourceKind,
        found: ResourceKind,
    },

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
