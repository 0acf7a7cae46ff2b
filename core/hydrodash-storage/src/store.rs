use hydrodash_listing::{
    ArchiveTransition, CompiledQuery, PageWindow, RecordStore, SqlParam, StoreResult, CASEFOLD_FN,
};
use hydrodash_model::DEVICES;
use hydrodash_types::{
    DeviceRecord, DeviceStatus, DeviceUpdate, NewDevice, NewUser, OwnerSummary, RecordId,
    ResourceKind, ResourceRecord, Role, UserRecord, UserStatus, UserUpdate,
};
use rusqlite::types::{Type, Value};
use rusqlite::functions::FunctionFlags;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, TransactionBehavior,
};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error};

use crate::error::{classify, StorageError, StorageResult};

const USER_COLUMNS: &str = "u.id, u.first_name, u.last_name, u.email, u.email_verified_at, \
     u.status, u.role, u.address, u.is_archived, u.created_at, u.updated_at";

const DEVICE_COLUMNS: &str = "d.id, d.user_id, d.name, d.serial_number, d.status, \
     d.is_archived, d.created_at, d.updated_at, o.id, o.first_name, o.last_name, o.email";

/// Users and devices backed by a SQLite database.
#[derive(Clone)]
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Opens an in-memory store (for testing and demos).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        register_functions(&conn)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL COLLATE NOCASE UNIQUE,
                email_verified_at INTEGER,
                status TEXT NOT NULL DEFAULT 'active',
                role TEXT NOT NULL DEFAULT 'user',
                address TEXT,
                is_archived INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS devices (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
                name TEXT NOT NULL,
                serial_number TEXT NOT NULL UNIQUE,
                status TEXT,
                is_archived INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_users_listing ON users(role, is_archived, created_at);
            CREATE INDEX IF NOT EXISTS idx_devices_listing ON devices(is_archived, created_at);
            CREATE INDEX IF NOT EXISTS idx_devices_user ON devices(user_id);
            ",
        )?;
        Ok(())
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    // ── Inserts ──────────────────────────────────────────────────

    /// Inserts a user and returns its identity.
    pub fn insert_user(&self, user: &NewUser) -> StorageResult<RecordId> {
        let conn = self.lock()?;
        let created = user.created_at.unwrap_or_else(now_millis);
        conn.execute(
            "INSERT INTO users (first_name, last_name, email, email_verified_at, status, role, \
             address, is_archived, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
            params![
                user.first_name,
                user.last_name,
                user.email,
                user.email_verified_at,
                user.status.as_str(),
                user.role.as_str(),
                user.address,
                user.archived,
                created,
            ],
        )
        .map_err(classify)?;
        Ok(RecordId::new(conn.last_insert_rowid()))
    }

    /// Inserts a device and returns its identity.
    pub fn insert_device(&self, device: &NewDevice) -> StorageResult<RecordId> {
        let conn = self.lock()?;
        let created = device.created_at.unwrap_or_else(now_millis);
        conn.execute(
            "INSERT INTO devices (user_id, name, serial_number, status, is_archived, \
             created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                device.user_id.map(|id| id.get()),
                device.name,
                device.serial_number,
                device.status.map(|s| s.as_str()),
                device.archived,
                created,
            ],
        )
        .map_err(classify)?;
        Ok(RecordId::new(conn.last_insert_rowid()))
    }

    // ── Lookups ──────────────────────────────────────────────────

    /// Loads a user by identity regardless of role or partition.
    pub fn get_user(&self, id: RecordId) -> StorageResult<Option<UserRecord>> {
        let conn = self.lock()?;
        load_user(&conn, id)
    }

    /// Loads a device with its owner summary.
    pub fn get_device(&self, id: RecordId) -> StorageResult<Option<DeviceRecord>> {
        let conn = self.lock()?;
        load_device(&conn, id)
    }

    /// Count and page fetch under one lock and one read transaction, so the
    /// window always describes the rows returned.
    fn read_page(
        &self,
        query: &CompiledQuery,
        page: u64,
        per_page: u64,
    ) -> StorageResult<(PageWindow, Vec<ResourceRecord>)> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
        let window = PageWindow::new(count_rows(&tx, query)?, page, per_page);
        let items = if window.is_empty() {
            Vec::new()
        } else {
            fetch_rows(&tx, query, window.limit(), window.offset())?
        };
        tx.commit()?;
        Ok((window, items))
    }

    fn set_archived_flag(
        &self,
        kind: ResourceKind,
        id: RecordId,
        archived: bool,
    ) -> StorageResult<Option<ArchiveTransition>> {
        let conn = self.lock()?;
        let table = table_name(kind);
        let changed = conn.execute(
            &format!(
                "UPDATE {table} SET is_archived = ?1, updated_at = ?2 \
                 WHERE id = ?3 AND is_archived != ?1"
            ),
            params![archived, now_millis(), id.get()],
        )?;
        if changed > 0 {
            return Ok(Some(ArchiveTransition::Changed));
        }
        let exists: bool = conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)"),
            params![id.get()],
            |row| row.get(0),
        )?;
        Ok(exists.then_some(ArchiveTransition::Unchanged))
    }

    fn write_user(&self, id: RecordId, update: &UserUpdate) -> StorageResult<Option<UserRecord>> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE users SET first_name = ?1, last_name = ?2, email = ?3, address = ?4, \
                 updated_at = ?5 WHERE id = ?6",
                params![
                    update.first_name.trim(),
                    update.last_name.trim(),
                    update.email.trim(),
                    update.address,
                    now_millis(),
                    id.get(),
                ],
            )
            .map_err(classify)?;
        if changed == 0 {
            return Ok(None);
        }
        load_user(&conn, id)
    }

    fn write_device(
        &self,
        id: RecordId,
        update: &DeviceUpdate,
    ) -> StorageResult<Option<DeviceRecord>> {
        let status = update.parsed_status()?;
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE devices SET name = ?1, status = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                update.name.trim(),
                status.map(|s| s.as_str()),
                now_millis(),
                id.get(),
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        load_device(&conn, id)
    }
}

impl RecordStore for SqliteRecordStore {
    fn fetch_page(
        &self,
        query: &CompiledQuery,
        page: u64,
        per_page: u64,
    ) -> StoreResult<(PageWindow, Vec<ResourceRecord>)> {
        debug!(kind = %query.kind, page, per_page, "fetching listing page");
        self.read_page(query, page, per_page)
            .map_err(|e| log_failure("fetch_page", e))
    }

    fn set_archived(
        &self,
        kind: ResourceKind,
        id: RecordId,
        archived: bool,
    ) -> StoreResult<Option<ArchiveTransition>> {
        self.set_archived_flag(kind, id, archived)
            .map_err(|e| log_failure("set_archived", e))
    }

    fn update_user(&self, id: RecordId, update: &UserUpdate) -> StoreResult<Option<UserRecord>> {
        self.write_user(id, update).map_err(|e| log_failure("update_user", e))
    }

    fn update_device(
        &self,
        id: RecordId,
        update: &DeviceUpdate,
    ) -> StoreResult<Option<DeviceRecord>> {
        self.write_device(id, update)
            .map_err(|e| log_failure("update_device", e))
    }
}

fn log_failure(op: &str, err: StorageError) -> hydrodash_listing::StoreError {
    if !matches!(err, StorageError::UniqueViolation { .. }) {
        error!(op, error = %err, "record store failure");
    }
    err.into()
}

/// SQL functions compiled queries rely on.
fn register_functions(conn: &Connection) -> StorageResult<()> {
    conn.create_scalar_function(
        CASEFOLD_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
    )?;
    Ok(())
}

fn count_rows(conn: &Connection, query: &CompiledQuery) -> StorageResult<u64> {
    let values: Vec<Value> = query.params.iter().map(to_value).collect();
    let count: i64 =
        conn.query_row(&query.count_sql(), params_from_iter(values), |row| row.get(0))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

fn fetch_rows(
    conn: &Connection,
    query: &CompiledQuery,
    limit: u64,
    offset: u64,
) -> StorageResult<Vec<ResourceRecord>> {
    let columns = match query.kind {
        ResourceKind::Users => USER_COLUMNS,
        ResourceKind::Devices => DEVICE_COLUMNS,
    };
    let sql = format!("{} LIMIT ? OFFSET ?", query.select_sql(columns));
    let mut values: Vec<Value> = query.params.iter().map(to_value).collect();
    values.push(Value::Integer(to_i64(limit)));
    values.push(Value::Integer(to_i64(offset)));

    let mut stmt = conn.prepare(&sql)?;
    let rows = match query.kind {
        ResourceKind::Users => stmt
            .query_map(params_from_iter(values), |row| {
                user_from_row(row).map(ResourceRecord::User)
            })?
            .collect::<Result<Vec<_>, _>>()?,
        ResourceKind::Devices => stmt
            .query_map(params_from_iter(values), |row| {
                device_from_row(row).map(ResourceRecord::Device)
            })?
            .collect::<Result<Vec<_>, _>>()?,
    };
    Ok(rows)
}

fn load_user(conn: &Connection, id: RecordId) -> StorageResult<Option<UserRecord>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = ?1");
    Ok(conn
        .query_row(&sql, params![id.get()], user_from_row)
        .optional()?)
}

fn load_device(conn: &Connection, id: RecordId) -> StorageResult<Option<DeviceRecord>> {
    let sql = format!("SELECT {DEVICE_COLUMNS} FROM {} WHERE d.id = ?1", DEVICES.source);
    Ok(conn
        .query_row(&sql, params![id.get()], device_from_row)
        .optional()?)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: RecordId::new(row.get(0)?),
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        email_verified_at: row.get(4)?,
        status: parse_column::<UserStatus>(row, 5)?,
        role: parse_column::<Role>(row, 6)?,
        address: row.get(7)?,
        archived: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn device_from_row(row: &Row<'_>) -> rusqlite::Result<DeviceRecord> {
    let status: Option<String> = row.get(4)?;
    let status = status
        .map(|s| {
            DeviceStatus::from_str(&s)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))
        })
        .transpose()?;
    let owner_id: Option<i64> = row.get(8)?;
    let owner = match owner_id {
        Some(owner_id) => Some(OwnerSummary {
            id: RecordId::new(owner_id),
            first_name: row.get(9)?,
            last_name: row.get(10)?,
            email: row.get(11)?,
        }),
        None => None,
    };
    Ok(DeviceRecord {
        id: RecordId::new(row.get(0)?),
        user_id: row.get::<_, Option<i64>>(1)?.map(RecordId::new),
        name: row.get(2)?,
        serial_number: row.get(3)?,
        status,
        archived: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        owner,
    })
}

fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = hydrodash_types::Error>,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn to_value(param: &SqlParam) -> Value {
    match param {
        SqlParam::Text(s) => Value::Text(s.clone()),
        SqlParam::Integer(i) => Value::Integer(*i),
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn table_name(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Users => "users",
        ResourceKind::Devices => "devices",
    }
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
