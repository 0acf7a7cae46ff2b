//! Error types for the storage layer.

use hydrodash_listing::StoreError;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A write hit a unique index.
    #[error("unique constraint failed on {field}")]
    UniqueViolation { field: String },

    /// A value outside its vocabulary, in a payload or a stored row.
    #[error("invalid value: {0}")]
    InvalidValue(#[from] hydrodash_types::Error),

    /// Another thread panicked while holding the connection.
    #[error("connection lock poisoned")]
    LockPoisoned,
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniqueViolation { field } => StoreError::UniqueViolation { field },
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Maps unique-constraint failures to [`StorageError::UniqueViolation`].
///
/// SQLite reports them as `UNIQUE constraint failed: table.column`.
pub(crate) fn classify(err: rusqlite::Error) -> StorageError {
    if let rusqlite::Error::SqliteFailure(code, Some(message)) = &err
        && code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    {
        let field = message
            .rsplit('.')
            .next()
            .unwrap_or(message.as_str())
            .trim()
            .to_string();
        return StorageError::UniqueViolation { field };
    }
    StorageError::Database(err)
}
