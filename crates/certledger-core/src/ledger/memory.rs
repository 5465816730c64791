//! In-memory ledger gateway.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

use super::{LedgerError, LedgerGateway, LedgerWrite, in_range};

/// Ledger held in a `BTreeMap`, ordered by key.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::LockPoisoned`] if a writer panicked.
    pub fn len(&self) -> Result<usize, LedgerError> {
        let entries = self.entries.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(entries.len())
    }

    /// Returns `true` if no keys are stored.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::LockPoisoned`] if a writer panicked.
    pub fn is_empty(&self) -> Result<bool, LedgerError> {
        Ok(self.len()? == 0)
    }
}

impl LedgerGateway for MemoryLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let entries = self.entries.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LedgerError::LockPoisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), LedgerError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LedgerError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn scan(&self, start: &str, end: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        let entries = self.entries.read().map_err(|_| LedgerError::LockPoisoned)?;
        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start)
        };
        Ok(entries
            .range::<str, _>((lower, Bound::Unbounded))
            .take_while(|(key, _)| in_range(key, start, end))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn apply(&self, writes: &[LedgerWrite]) -> Result<(), LedgerError> {
        // Holding the write lock for the whole batch makes it atomic for
        // every other reader and writer.
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LedgerError::LockPoisoned)?;
        for write in writes {
            match write {
                LedgerWrite::Put { key, value } => {
                    entries.insert(key.clone(), value.clone());
                },
                LedgerWrite::Delete { key } => {
                    entries.remove(key);
                },
            }
        }
        Ok(())
    }
}
