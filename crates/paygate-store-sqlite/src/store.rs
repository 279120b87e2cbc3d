// crates/paygate-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Purchase Store
// Description: Durable PurchaseStore backed by SQLite WAL.
// Purpose: Persist append-only purchase records with integrity checks.
// Dependencies: paygate-core, rusqlite, serde_json
// ============================================================================

//! ## Overview
//! Each insert writes one JSON snapshot of the record alongside indexed
//! columns for lookups. The `(store, transaction_id)` primary key enforces
//! the append-only audit contract; constraint violations surface as
//! [`StoreError::Duplicate`]. Loads fail closed when stored JSON does not
//! decode back into a record.
//! Security posture: database contents are untrusted on load; see
//! `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use paygate_core::PurchaseRecord;
use paygate_core::PurchaseStore;
use paygate_core::StoreError;
use paygate_core::StoreKind;
use paygate_core::Timestamp;
use paygate_core::UserId;
use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the pragma value for the mode.
    const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// Configuration for opening a [`SqlitePurchaseStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteStoreConfig {
    /// Database file path.
    pub path: PathBuf,
    /// Journal mode.
    pub mode: SqliteStoreMode,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u64,
}

impl SqliteStoreConfig {
    /// Creates a config with default mode and timeout for the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: SqliteStoreMode::default(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Durable append-only purchase store.
///
/// # Invariants
/// - `(store, transaction_id)` is unique; inserts never replace.
/// - Stored snapshots are canonical JSON of [`PurchaseRecord`].
pub struct SqlitePurchaseStore {
    /// Serialized access to the underlying connection.
    conn: Mutex<Connection>,
}

impl core::fmt::Debug for SqlitePurchaseStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SqlitePurchaseStore").finish_non_exhaustive()
    }
}

impl SqlitePurchaseStore {
    /// Opens (and, for new files, initializes) the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when path guards fail, the database cannot be
    /// opened, or the on-disk schema version does not match.
    pub fn open(config: &SqliteStoreConfig) -> Result<Self, StoreError> {
        validate_path(&config.path)?;
        let conn = Connection::open_with_flags(
            &config.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )
        .map_err(|err| StoreError::Io(format!("open failed: {err}")))?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(|err| StoreError::Io(format!("busy timeout failed: {err}")))?;
        conn.pragma_update_and_check(None, "journal_mode", config.mode.pragma_value(), |_row| {
            Ok(())
        })
        .map_err(|err| StoreError::Io(format!("journal mode failed: {err}")))?;

        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .map_err(|err| StoreError::Io(format!("version read failed: {err}")))?;
        match version {
            0 => {
                conn.execute_batch(
                    "CREATE TABLE IF NOT EXISTS purchases (
                        store TEXT NOT NULL,
                        transaction_id TEXT NOT NULL,
                        user_id INTEGER NOT NULL,
                        unified_package_id TEXT NOT NULL,
                        purchase_time_key INTEGER NOT NULL,
                        record_json TEXT NOT NULL,
                        PRIMARY KEY (store, transaction_id)
                    );
                    CREATE INDEX IF NOT EXISTS idx_purchases_user
                        ON purchases (user_id, purchase_time_key);",
                )
                .map_err(|err| StoreError::Io(format!("schema create failed: {err}")))?;
                conn.pragma_update(None, "user_version", SCHEMA_VERSION)
                    .map_err(|err| StoreError::Io(format!("version write failed: {err}")))?;
            }
            SCHEMA_VERSION => {}
            other => {
                return Err(StoreError::Invalid(format!(
                    "purchase store schema version mismatch: {other}"
                )));
            }
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Runs one closure against the connection, mapping poisoned locks.
    fn with_conn<T>(
        &self,
        op: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Store("purchase store lock poisoned".to_string()))?;
        op(&conn)
    }
}

impl PurchaseStore for SqlitePurchaseStore {
    fn insert(&self, record: &PurchaseRecord) -> Result<(), StoreError> {
        let snapshot = serde_json::to_string(record)
            .map_err(|err| StoreError::Invalid(format!("record serialization failed: {err}")))?;
        let time_key = time_key(record.purchase_time);
        self.with_conn(|conn| {
            let outcome = conn.execute(
                "INSERT INTO purchases
                    (store, transaction_id, user_id, unified_package_id,
                     purchase_time_key, record_json)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.store.as_str(),
                    record.transaction_id,
                    i64::try_from(record.user_id.get()).unwrap_or(i64::MAX),
                    record.unified_package_id.as_str(),
                    time_key,
                    snapshot,
                ],
            );
            match outcome {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(failure, _))
                    if failure.code == ErrorCode::ConstraintViolation =>
                {
                    Err(StoreError::Duplicate(record.transaction_id.clone()))
                }
                Err(err) => Err(StoreError::Io(format!("insert failed: {err}"))),
            }
        })
    }

    fn find_by_transaction(
        &self,
        store: StoreKind,
        transaction_id: &str,
    ) -> Result<Option<PurchaseRecord>, StoreError> {
        self.with_conn(|conn| {
            let snapshot: Option<String> = conn
                .query_row(
                    "SELECT record_json FROM purchases
                     WHERE store = ?1 AND transaction_id = ?2",
                    params![store.as_str(), transaction_id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|err| StoreError::Io(format!("lookup failed: {err}")))?;
            snapshot.map(|raw| decode_record(&raw)).transpose()
        })
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<PurchaseRecord>, StoreError> {
        self.with_conn(|conn| {
            let mut statement = conn
                .prepare(
                    "SELECT record_json FROM purchases
                     WHERE user_id = ?1
                     ORDER BY purchase_time_key DESC",
                )
                .map_err(|err| StoreError::Io(format!("list prepare failed: {err}")))?;
            let rows = statement
                .query_map(params![i64::try_from(user_id.get()).unwrap_or(i64::MAX)], |row| {
                    row.get::<_, String>(0)
                })
                .map_err(|err| StoreError::Io(format!("list failed: {err}")))?;
            let mut records = Vec::new();
            for row in rows {
                let raw = row.map_err(|err| StoreError::Io(format!("list row failed: {err}")))?;
                records.push(decode_record(&raw)?);
            }
            Ok(records)
        })
    }

    fn readiness(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |_row| Ok(()))
                .map_err(|err| StoreError::Store(format!("readiness probe failed: {err}")))
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes a stored snapshot, failing closed on corruption.
fn decode_record(raw: &str) -> Result<PurchaseRecord, StoreError> {
    serde_json::from_str(raw)
        .map_err(|err| StoreError::Corrupt(format!("record snapshot undecodable: {err}")))
}

/// Sort key for newest-first listings.
fn time_key(timestamp: Timestamp) -> i64 {
    match timestamp {
        Timestamp::UnixMillis(millis) => millis,
        Timestamp::Logical(tick) => i64::try_from(tick).unwrap_or(i64::MAX),
    }
}

/// Enforces path length limits before touching the filesystem.
fn validate_path(path: &Path) -> Result<(), StoreError> {
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(StoreError::Invalid("store path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(StoreError::Invalid("store path component too long".to_string()));
        }
    }
    Ok(())
}
