//! SQLite storage layer for Hydrodash.
//!
//! [`SqliteRecordStore`] executes the listing engine's compiled queries and
//! performs archive transitions and admin edits as single statements. The
//! connection sits behind a mutex; every public call takes it once.

mod error;
mod fixtures;
mod store;

pub use error::{StorageError, StorageResult};
pub use fixtures::seed_demo;
pub use store::SqliteRecordStore;
