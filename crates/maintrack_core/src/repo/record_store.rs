//! Key/value record store for serialized state blobs.
//!
//! # Responsibility
//! - Persist whole-value JSON blobs under stable keys.
//! - Recover from malformed blobs by substituting defaults.
//!
//! # Invariants
//! - Writes overwrite the full value for a key (no partial updates).
//! - Multi-key writes commit in one transaction.
//! - Reads never fail on unparsable content; only storage transport errors
//!   propagate.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key of the workshop hierarchy.
pub const WORKSHOPS_KEY: &str = "production_lines_v3";
/// Storage key of the completion history log.
pub const HISTORY_KEY: &str = "maintenance_history_v3";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from record store operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Value could not be encoded for storage.
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "record store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::Encode { key, source } => write!(f, "failed to encode record `{key}`: {source}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::Encode { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Blob-level persistence contract.
pub trait RecordStore {
    /// Reads the raw blob stored under `key`.
    fn read_blob(&self, key: &str) -> RepoResult<Option<String>>;
    /// Overwrites every `(key, blob)` pair atomically.
    fn write_blobs(&self, entries: &[(&str, String)]) -> RepoResult<()>;
}

/// SQLite-backed record store over the `records` table.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Creates a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn read_blob(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM records WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write_blobs(&self, entries: &[(&str, String)]) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO records (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn read_blob(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).read_blob(key)
    }

    fn write_blobs(&self, entries: &[(&str, String)]) -> RepoResult<()> {
        (**self).write_blobs(entries)
    }
}

/// Loads and decodes `key`, falling back to `T::default()`.
///
/// Missing keys and malformed blobs both yield the default; malformed blobs
/// additionally emit a `status=recovered` warning.
pub fn load_or_default<S, T>(store: &S, key: &str) -> RepoResult<T>
where
    S: RecordStore + ?Sized,
    T: DeserializeOwned + Default,
{
    let Some(blob) = store.read_blob(key)? else {
        return Ok(T::default());
    };
    match serde_json::from_str(&blob) {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(
                "event=record_load module=repo status=recovered key={} blob_len={} error={}",
                key,
                blob.len(),
                err
            );
            Ok(T::default())
        }
    }
}

/// Encodes `value` as JSON for storage under `key`.
pub fn encode_record<T: Serialize + ?Sized>(key: &str, value: &T) -> RepoResult<String> {
    serde_json::to_string(value).map_err(|source| RepoError::Encode {
        key: key.to_string(),
        source,
    })
}

/// Encodes and stores one value, overwriting any previous blob.
pub fn save<S, T>(store: &S, key: &str, value: &T) -> RepoResult<()>
where
    S: RecordStore + ?Sized,
    T: Serialize + ?Sized,
{
    let blob = encode_record(key, value)?;
    store.write_blobs(&[(key, blob)])
}
