//! Listing rows.
//!
//! Timestamps are Unix milliseconds. The `archived` flag decides which
//! listing partition a record belongs to; everything else is display data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, RecordId, ResourceKind};

/// Account status of a dashboard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for UserStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(Error::UnknownVariant {
                kind: "user status",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account role. Administrators never appear in the users listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(Error::UnknownVariant {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

/// Connection state reported by a hydroponic controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceStatus {
    #[serde(rename = "connected")]
    Connected,
    #[serde(rename = "not connected")]
    NotConnected,
}

impl DeviceStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::NotConnected => "not connected",
        }
    }
}

impl FromStr for DeviceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "connected" => Ok(Self::Connected),
            "not connected" => Ok(Self::NotConnected),
            other => Err(Error::UnknownVariant {
                kind: "device status",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user row as shown in the users listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub email_verified_at: Option<i64>,
    pub status: UserStatus,
    pub role: Role,
    pub address: Option<String>,
    pub archived: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl UserRecord {
    /// `first_name last_name`, the value the `name` sort key orders by.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }
}

/// The owning user of a device, joined one hop for display and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A device row as shown in the devices listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub id: RecordId,
    pub user_id: Option<RecordId>,
    pub name: String,
    pub serial_number: String,
    pub status: Option<DeviceStatus>,
    pub archived: bool,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerSummary>,
}

/// Either kind of listing row.
///
/// Serialized untagged: a listing response carries a single resource kind,
/// and the two record shapes do not overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceRecord {
    User(UserRecord),
    Device(DeviceRecord),
}

impl ResourceRecord {
    #[must_use]
    pub fn id(&self) -> RecordId {
        match self {
            Self::User(u) => u.id,
            Self::Device(d) => d.id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::User(_) => ResourceKind::Users,
            Self::Device(_) => ResourceKind::Devices,
        }
    }

    #[must_use]
    pub fn is_archived(&self) -> bool {
        match self {
            Self::User(u) => u.archived,
            Self::Device(d) => d.archived,
        }
    }

    #[must_use]
    pub fn as_user(&self) -> Option<&UserRecord> {
        match self {
            Self::User(u) => Some(u),
            Self::Device(_) => None,
        }
    }

    #[must_use]
    pub fn as_device(&self) -> Option<&DeviceRecord> {
        match self {
            Self::Device(d) => Some(d),
            Self::User(_) => None,
        }
    }
}

impl From<UserRecord> for ResourceRecord {
    fn from(user: UserRecord) -> Self {
        Self::User(user)
    }
}

impl From<DeviceRecord> for ResourceRecord {
    fn from(device: DeviceRecord) -> Self {
        Self::Device(device)
    }
}
