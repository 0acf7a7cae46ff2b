//! Core type definitions for Hydrodash.
//!
//! This crate defines the plain data types shared by the listing engine,
//! the storage layer, the HTTP service and the dashboard client:
//! - Record identifiers and resource kinds
//! - User and device records as they appear in listings
//! - Update and insert payloads
//! - Sort direction, shared by server-side resolution and client-side toggling
//!
//! Nothing here touches a database or the network.

mod ids;
mod record;
mod sort;
mod update;

pub use ids::{RecordId, ResourceKind};
pub use record::{
    DeviceRecord, DeviceStatus, OwnerSummary, ResourceRecord, Role, UserRecord, UserStatus,
};
pub use sort::SortDirection;
pub use update::{DeviceUpdate, FieldErrors, NewDevice, NewUser, RecordUpdate, UserUpdate};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid record id: {0}")]
    InvalidId(String),

    #[error("unknown {kind} value: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}
