//! Record store abstraction.
//!
//! The listing engine compiles queries; a store executes them. Store calls
//! are blocking and are expected to be driven from a blocking-capable thread.

use hydrodash_types::{DeviceRecord, RecordId, ResourceKind, ResourceRecord, UserRecord};
use hydrodash_types::{DeviceUpdate, UserUpdate};

use crate::archive::ArchiveTransition;
use crate::error::StoreResult;
use crate::paginator::PageWindow;
use crate::query::CompiledQuery;

/// Persistence collaborator consumed by the listing engine.
pub trait RecordStore: Send + Sync {
    /// Counts the rows matching the compiled predicate and fetches one page
    /// of them in compiled order, both from the same snapshot. The requested
    /// page is clamped against that count before fetching.
    fn fetch_page(
        &self,
        query: &CompiledQuery,
        page: u64,
        per_page: u64,
    ) -> StoreResult<(PageWindow, Vec<ResourceRecord>)>;

    /// Sets the archive flag in a single statement.
    /// Returns `None` when no row has that identity.
    fn set_archived(
        &self,
        kind: ResourceKind,
        id: RecordId,
        archived: bool,
    ) -> StoreResult<Option<ArchiveTransition>>;

    /// Replaces a user's editable fields. `None` when the user does not exist.
    fn update_user(&self, id: RecordId, update: &UserUpdate) -> StoreResult<Option<UserRecord>>;

    /// Replaces a device's editable fields. `None` when the device does not exist.
    fn update_device(
        &self,
        id: RecordId,
        update: &DeviceUpdate,
    ) -> StoreResult<Option<DeviceRecord>>;
}

/// An in-memory store for testing.
///
/// It cannot evaluate SQL: every compiled query matches all records of the
/// query's kind. Compiled queries are captured for inspection.
pub mod mock {
    use super::*;
    use crate::error::StoreError;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Debug, Default)]
    pub struct MockRecordStore {
        records: Mutex<Vec<ResourceRecord>>,
        queries: Mutex<Vec<CompiledQuery>>,
    }

    impl MockRecordStore {
        /// Creates a store holding the given records.
        pub fn new(records: Vec<ResourceRecord>) -> Self {
            Self {
                records: Mutex::new(records),
                queries: Mutex::new(Vec::new()),
            }
        }

        /// Queries passed to `fetch_page`, in call order.
        pub fn captured_queries(&self) -> Vec<CompiledQuery> {
            lock(&self.queries).map(|q| q.clone()).unwrap_or_default()
        }

        /// Snapshot of the stored records.
        pub fn records(&self) -> Vec<ResourceRecord> {
            lock(&self.records).map(|r| r.clone()).unwrap_or_default()
        }

        fn of_kind(&self, kind: ResourceKind) -> StoreResult<Vec<ResourceRecord>> {
            Ok(lock(&self.records)?
                .iter()
                .filter(|r| r.kind() == kind)
                .cloned()
                .collect())
        }
    }

    fn lock<T>(mutex: &Mutex<T>) -> StoreResult<MutexGuard<'_, T>> {
        mutex
            .lock()
            .map_err(|_| StoreError::Backend("mock store lock poisoned".into()))
    }

    impl RecordStore for MockRecordStore {
        fn fetch_page(
            &self,
            query: &CompiledQuery,
            page: u64,
            per_page: u64,
        ) -> StoreResult<(PageWindow, Vec<ResourceRecord>)> {
            lock(&self.queries)?.push(query.clone());
            let matching = self.of_kind(query.kind)?;
            let window = PageWindow::new(matching.len() as u64, page, per_page);
            let items = matching
                .into_iter()
                .skip(window.offset() as usize)
                .take(window.limit() as usize)
                .collect();
            Ok((window, items))
        }

        fn set_archived(
            &self,
            kind: ResourceKind,
            id: RecordId,
            archived: bool,
        ) -> StoreResult<Option<ArchiveTransition>> {
            let mut records = lock(&self.records)?;
            let Some(record) = records.iter_mut().find(|r| r.kind() == kind && r.id() == id)
            else {
                return Ok(None);
            };
            let flag = match record {
                ResourceRecord::User(u) => &mut u.archived,
                ResourceRecord::Device(d) => &mut d.archived,
            };
            if *flag == archived {
                return Ok(Some(ArchiveTransition::Unchanged));
            }
            *flag = archived;
            Ok(Some(ArchiveTransition::Changed))
        }

        fn update_user(
            &self,
            id: RecordId,
            update: &UserUpdate,
        ) -> StoreResult<Option<UserRecord>> {
            let mut records = lock(&self.records)?;
            let taken = records.iter().any(|r| {
                r.as_user()
                    .is_some_and(|u| u.id != id && u.email.eq_ignore_ascii_case(&update.email))
            });
            let Some(ResourceRecord::User(user)) = records
                .iter_mut()
                .find(|r| r.kind() == ResourceKind::Users && r.id() == id)
            else {
                return Ok(None);
            };
            if taken {
                return Err(StoreError::UniqueViolation {
                    field: "email".into(),
                });
            }
            user.first_name = update.first_name.clone();
            user.last_name = update.last_name.clone();
            user.email = update.email.clone();
            user.address = update.address.clone();
            Ok(Some(user.clone()))
        }

        fn update_device(
            &self,
            id: RecordId,
            update: &DeviceUpdate,
        ) -> StoreResult<Option<DeviceRecord>> {
            let status = update
                .parsed_status()
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            let mut records = lock(&self.records)?;
            let Some(ResourceRecord::Device(device)) = records
                .iter_mut()
                .find(|r| r.kind() == ResourceKind::Devices && r.id() == id)
            else {
                return Ok(None);
            };
            device.name = update.name.clone();
            device.status = status;
            Ok(Some(device.clone()))
        }
    }
}
