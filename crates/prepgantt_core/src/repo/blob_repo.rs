//! Key/value blob store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide opaque load/save/delete of text blobs under fixed keys.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `save` is a whole-value overwrite; last write wins.
//! - Repositories refuse connections that have not been migrated.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed storage keys, one per logical dataset.
pub mod keys {
    /// Current session unit collection (JSON array of units).
    pub const BLOCKS: &str = "prepgantt.blocks.v1";
    /// Currently asserted user identity (JSON object).
    pub const USER: &str = "prepgantt.user.v1";
    /// All named plans of every user (JSON array).
    pub const PLANS: &str = "prepgantt.plans.v1";
    /// Id of the plan most recently opened or saved (JSON string).
    pub const ACTIVE_PLAN: &str = "prepgantt.active_plan.v1";
}

const REQUIRED_TABLE: &str = "blobs";

pub type RepoResult<T> = Result<T, RepoError>;

/// Blob store errors.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Connection schema version is behind this binary.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
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
                "connection is not migrated: expected schema version {expected_version}, found {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is missing required table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } | Self::MissingRequiredTable(_) => None,
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

/// Opaque key/value text store.
pub trait BlobStore {
    /// Returns the stored blob, or `None` when the key was never written.
    fn load(&self, key: &str) -> RepoResult<Option<String>>;
    /// Overwrites the blob stored under `key`.
    fn save(&self, key: &str, blob: &str) -> RepoResult<()>;
    /// Deletes `key`; returns whether a value existed.
    fn delete(&self, key: &str) -> RepoResult<bool>;
}

/// SQLite-backed blob store over the `blobs` table.
pub struct SqliteBlobStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlobStore<'conn> {
    /// Constructs a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BlobStore for SqliteBlobStore<'_> {
    fn load(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM blobs WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn save(&self, key: &str, blob: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO blobs (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, blob],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM blobs WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [REQUIRED_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(REQUIRED_TABLE));
    }

    Ok(())
}
