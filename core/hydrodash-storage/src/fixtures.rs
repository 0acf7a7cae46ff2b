//! Demo data for a fresh database.

use hydrodash_types::{DeviceStatus, NewDevice, NewUser, Role, UserStatus};
use tracing::info;

use crate::error::StorageResult;
use crate::store::{now_millis, SqliteRecordStore};

const HOUR_MS: i64 = 60 * 60 * 1000;

/// Seeds an administrator, four growers and fifteen devices.
///
/// Creation times are spaced an hour apart so the default newest-first
/// ordering is stable.
pub fn seed_demo(store: &SqliteRecordStore) -> StorageResult<()> {
    let base = now_millis() - 100 * HOUR_MS;

    store.insert_user(
        &NewUser::new("Site", "Admin", "admin@hydrodash.local")
            .with_role(Role::Admin)
            .verified_at(base)
            .created_at(base),
    )?;

    let growers = [
        ("John", "Doe", "john@example.com", UserStatus::Active, true),
        ("Jane", "Smith", "jane@example.com", UserStatus::Active, true),
        ("Bob", "Johnson", "bob@example.com", UserStatus::Inactive, false),
        ("Alice", "Williams", "alice@example.com", UserStatus::Inactive, false),
    ];
    let mut owners = Vec::with_capacity(growers.len());
    for (i, (first, last, email, status, verified)) in growers.into_iter().enumerate() {
        let created = base + (i as i64 + 1) * HOUR_MS;
        let mut user = NewUser::new(first, last, email)
            .with_status(status)
            .created_at(created);
        if verified {
            user = user.verified_at(created);
        }
        owners.push(store.insert_user(&user)?);
    }

    for n in 1..=15_i64 {
        let owner = owners[(n as usize) % owners.len()];
        let status = if n % 3 == 0 {
            DeviceStatus::NotConnected
        } else {
            DeviceStatus::Connected
        };
        store.insert_device(
            &NewDevice::new(format!("Grow Tower {n:02}"), format!("HD-{n:05}"))
                .owned_by(owner)
                .with_status(status)
                .created_at(base + (10 + n) * HOUR_MS),
        )?;
    }

    info!(users = 5, devices = 15, "seeded demo data");
    Ok(())
}
