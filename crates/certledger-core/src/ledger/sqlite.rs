//! `SQLite`-backed ledger gateway.
//!
//! This module stores the ledger's world state in a single `SQLite` table
//! with WAL mode enabled. [`SqliteLedger`] implements [`LedgerGateway`];
//! batches run inside one `SQLite` transaction.

// SQLite returns i64 for counts, but they're always non-negative.
#![allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, OpenFlags, OptionalExtension, params};

use super::{LedgerError, LedgerGateway, LedgerWrite};

/// Schema SQL embedded at compile time.
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Ledger gateway backed by a `SQLite` database.
pub struct SqliteLedger {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteLedger {
    /// Opens or creates a ledger at the specified path.
    ///
    /// If the database doesn't exist, it is created with the world-state
    /// schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch(SCHEMA_SQL)?;
        tracing::debug!(path = %path.display(), "opened sqlite ledger");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path.to_path_buf()),
        })
    }

    /// Creates an in-memory ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self, LedgerError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    /// Returns the database path, or `None` for an in-memory ledger.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the number of stored keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count(&self) -> Result<u64, LedgerError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM world_state", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, LedgerError> {
        self.conn.lock().map_err(|_| LedgerError::LockPoisoned)
    }
}

impl LedgerGateway for SqliteLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM world_state WHERE key = ?1",
                params![key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO world_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), LedgerError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM world_state WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn scan(&self, start: &str, end: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        let conn = self.lock()?;

        // TEXT keys compare with the BINARY collation, i.e. byte order.
        let mut stmt = conn.prepare(
            "SELECT key, value FROM world_state
             WHERE (?1 = '' OR key >= ?1) AND (?2 = '' OR key < ?2)
             ORDER BY key ASC",
        )?;

        let entries = stmt
            .query_map(params![start, end], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn apply(&self, writes: &[LedgerWrite]) -> Result<(), LedgerError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        {
            let mut put = tx.prepare(
                "INSERT INTO world_state (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )?;
            let mut delete = tx.prepare("DELETE FROM world_state WHERE key = ?1")?;

            for write in writes {
                match write {
                    LedgerWrite::Put { key, value } => {
                        put.execute(params![key, value])?;
                    },
                    LedgerWrite::Delete { key } => {
                        delete.execute(params![key])?;
                    },
                }
            }
        }

        tx.commit()?;
        Ok(())
    }
}
