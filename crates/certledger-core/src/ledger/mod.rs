//! Key-value ledger gateway.
//!
//! The lifecycle engine consumes the ledger through [`LedgerGateway`]: point
//! reads and writes, ordered range scans and atomic multi-key batches. Two
//! gateways ship with the crate:
//!
//! - [`MemoryLedger`]: a `BTreeMap` behind a lock, for tests and ephemeral
//!   runs
//! - [`SqliteLedger`]: a `SQLite` world-state table in WAL mode
//!
//! Consensus, replication and block production belong to whatever sits
//! behind a gateway, not to this crate.
//!
//! # Example
//!
//! ```rust
//! use certledger_core::ledger::{LedgerGateway, LedgerWrite, MemoryLedger};
//!
//! # fn example() -> Result<(), certledger_core::ledger::LedgerError> {
//! let ledger = MemoryLedger::new();
//! ledger.put("b", b"2".to_vec())?;
//! ledger.apply(&[
//!     LedgerWrite::put("a", b"1".to_vec()),
//!     LedgerWrite::delete("b"),
//! ])?;
//!
//! let entries = ledger.scan("", "")?;
//! assert_eq!(entries, vec![("a".to_string(), b"1".to_vec())]);
//! # Ok(())
//! # }
//! ```

mod memory;
mod sqlite;


pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;
use thiserror::Error;

/// Errors raised by a ledger gateway.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LedgerError {
    /// Database error from `SQLite`.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O error while opening the ledger.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding the ledger was poisoned by a panicking writer.
    #[error("ledger lock poisoned")]
    LockPoisoned,

    /// Any other backend failure.
    #[error("backend failure: {0}")]
    Backend(String),
}

/// One write inside an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerWrite {
    /// Store `value` under `key`, replacing any existing value.
    Put {
        /// Target key.
        key: String,
        /// Value bytes.
        value: Vec<u8>,
    },
    /// Remove `key` if present.
    Delete {
        /// Target key.
        key: String,
    },
}

impl LedgerWrite {
    /// Creates a put.
    #[must_use]
    pub fn put(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self::Put {
            key: key.into(),
            value,
        }
    }

    /// Creates a delete.
    #[must_use]
    pub fn delete(key: impl Into<String>) -> Self {
        Self::Delete { key: key.into() }
    }

    /// Returns the key this write touches.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Put { key, .. } | Self::Delete { key } => key,
        }
    }
}

/// Storage interface consumed by the asset store.
///
/// Implementations must provide read-your-writes consistency for a single
/// caller and must return scan results in ascending byte order of keys.
pub trait LedgerGateway: Send + Sync {
    /// Returns the value stored under `key`, or `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Stores `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn delete(&self, key: &str) -> Result<(), LedgerError>;

    /// Returns all entries with `start <= key < end` in key order.
    ///
    /// An empty `start` or `end` leaves that side of the range open, so
    /// `scan("", "")` covers the whole keyspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn scan(&self, start: &str, end: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError>;

    /// Applies every write in `writes` atomically: either all of them
    /// become visible or none does.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch could not be committed; in that case
    /// the ledger is unchanged.
    fn apply(&self, writes: &[LedgerWrite]) -> Result<(), LedgerError>;
}

impl<L: LedgerGateway + ?Sized> LedgerGateway for Box<L> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), LedgerError> {
        (**self).delete(key)
    }

    fn scan(&self, start: &str, end: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        (**self).scan(start, end)
    }

    fn apply(&self, writes: &[LedgerWrite]) -> Result<(), LedgerError> {
        (**self).apply(writes)
    }
}

/// Returns `true` if `key` falls inside the half-open scan range.
pub(crate) fn in_range(key: &str, start: &str, end: &str) -> bool {
    (start.is_empty() || key >= start) && (end.is_empty() || key < end)
}
