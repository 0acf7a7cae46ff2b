//! Write payloads: admin edits and fixture inserts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{DeviceStatus, RecordId, ResourceKind, Result, Role, UserStatus};

/// Field name to human-readable validation message.
pub type FieldErrors = BTreeMap<String, String>;

/// Editable user fields. Missing fields decode as empty and fail
/// validation as required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// Editable device fields. The serial number is fixed at registration.
///
/// `status` keeps the wire token as sent so an unknown value reaches
/// validation instead of failing the body decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceUpdate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl DeviceUpdate {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: DeviceStatus) -> Self {
        self.status = Some(status.as_str().to_string());
        self
    }

    /// The requested status. A blank token clears it.
    pub fn parsed_status(&self) -> Result<Option<DeviceStatus>> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(token) => token.parse().map(Some),
        }
    }
}

/// An update addressed to one resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordUpdate {
    User(UserUpdate),
    Device(DeviceUpdate),
}

impl RecordUpdate {
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::User(_) => ResourceKind::Users,
            Self::Device(_) => ResourceKind::Devices,
        }
    }
}

/// A user row to insert. Used by fixtures and the demo seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub email_verified_at: Option<i64>,
    pub status: UserStatus,
    pub role: Role,
    pub address: Option<String>,
    pub archived: bool,
    /// Explicit creation time; the store uses the current time when `None`.
    pub created_at: Option<i64>,
}

impl NewUser {
    /// An active, unverified, non-admin user.
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            email_verified_at: None,
            status: UserStatus::Active,
            role: Role::User,
            address: None,
            archived: false,
            created_at: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn verified_at(mut self, millis: i64) -> Self {
        self.email_verified_at = Some(millis);
        self
    }

    #[must_use]
    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }

    #[must_use]
    pub fn created_at(mut self, millis: i64) -> Self {
        self.created_at = Some(millis);
        self
    }
}

/// A device row to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDevice {
    pub user_id: Option<RecordId>,
    pub name: String,
    pub serial_number: String,
    pub status: Option<DeviceStatus>,
    pub archived: bool,
    pub created_at: Option<i64>,
}

impl NewDevice {
    #[must_use]
    pub fn new(name: impl Into<String>, serial_number: impl Into<String>) -> Self {
        Self {
            user_id: None,
            name: name.into(),
            serial_number: serial_number.into(),
            status: None,
            archived: false,
            created_at: None,
        }
    }

    #[must_use]
    pub fn owned_by(mut self, user_id: RecordId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: DeviceStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }

    #[must_use]
    pub fn created_at(mut self, millis: i64) -> Self {
        self.created_at = Some(millis);
        self
    }
}
