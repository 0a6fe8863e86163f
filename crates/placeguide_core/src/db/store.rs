//! Explicit store handle with an open/close lifecycle.
//!
//! # Responsibility
//! - Own exactly one migrated SQLite connection for the caller's run.
//! - Hand out borrows of that connection to repositories.
//!
//! # Invariants
//! - A `PlaceStore` is never global; callers construct and pass it.
//! - `close` surfaces flush/close failures instead of dropping them.

use super::{open_db, open_db_in_memory, DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Owned handle over the place database.
pub struct PlaceStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl PlaceStore {
    /// Opens (creating when missing) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = open_db(&path)?;
        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
            path: None,
        })
    }

    /// Borrowed connection for repository construction.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Backing file path; `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Closes the underlying connection.
    pub fn close(self) -> DbResult<()> {
        let mode = if self.path.is_some() { "file" } else { "memory" };
        match self.conn.close() {
            Ok(()) => {
                info!("event=db_close module=db status=ok mode={mode}");
                Ok(())
            }
            Err((_conn, err)) => {
                error!(
                    "event=db_close module=db status=error mode={mode} error_code=db_close_failed error={err}"
                );
                Err(DbError::Sqlite(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PlaceStore;

    #[test]
    fn in_memory_store_has_no_path_and_closes_cleanly() {
        let store = PlaceStore::open_in_memory().unwrap();
        assert!(store.path().is_none());
        store.close().unwrap();
    }

    #[test]
    fn file_store_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.db");

        let store = PlaceStore::open(&path).unwrap();
        assert_eq!(store.path(), Some(path.as_path()));
        store.close().unwrap();
        assert!(path.exists());
    }
}
