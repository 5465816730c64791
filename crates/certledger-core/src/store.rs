//! Asset records keyed by derived identifier.
//!
//! [`AssetStore`] is the only component that talks to the
//! [`LedgerGateway`]. It encodes and decodes assets and maps absent keys to
//! [`CertError::NotFound`]. It does not enforce lifecycle rules; those live
//! in the engine.

use chrono::NaiveDate;

use crate::asset::Asset;
use crate::error::CertError;
use crate::ledger::{LedgerGateway, LedgerWrite};

/// CRUD access to assets on top of a ledger gateway.
#[derive(Debug)]
pub struct AssetStore<L> {
    ledger: L,
}

impl<L: LedgerGateway> AssetStore<L> {
    /// Wraps a ledger gateway.
    #[must_use]
    pub const fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Returns the underlying gateway.
    #[must_use]
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Consumes the store and returns the underlying gateway.
    #[must_use]
    pub fn into_ledger(self) -> L {
        self.ledger
    }

    /// Returns `true` if a record is present under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::Ledger`] if the gateway fails.
    pub fn exists(&self, id: &str) -> Result<bool, CertError> {
        Ok(self.ledger.get(id)?.is_some())
    }

    /// Reads the asset stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::NotFound`] if absent, [`CertError::Decode`] if
    /// the stored bytes are not an asset.
    pub fn get(&self, id: &str) -> Result<Asset, CertError> {
        let bytes = self
            .ledger
            .get(id)?
            .ok_or_else(|| CertError::not_found(id))?;
        Asset::decode(id, &bytes)
    }

    /// Reads the asset under `id`, returning `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::Decode`] if the stored bytes are not an asset.
    pub fn find(&self, id: &str) -> Result<Option<Asset>, CertError> {
        self.ledger
            .get(id)?
            .map(|bytes| Asset::decode(id, &bytes))
            .transpose()
    }

    /// Writes `asset` under its id, overwriting any existing record.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the gateway write fails.
    pub fn put(&self, asset: &Asset) -> Result<(), CertError> {
        let bytes = asset.encode()?;
        self.ledger.put(&asset.id, bytes)?;
        tracing::debug!(asset_id = %asset.id, "stored asset");
        Ok(())
    }

    /// Removes the asset under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::NotFound`] if absent.
    pub fn delete(&self, id: &str) -> Result<(), CertError> {
        if !self.exists(id)? {
            return Err(CertError::not_found(id));
        }
        self.ledger.delete(id)?;
        tracing::debug!(asset_id = %id, "deleted asset");
        Ok(())
    }

    /// Creates a new asset with `renew = false`.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::AlreadyExists`] if the derived id is taken.
    pub fn create(
        &self,
        owner: &str,
        product: &str,
        cert_type: &str,
        expire_date: NaiveDate,
    ) -> Result<Asset, CertError> {
        let asset = Asset::new(owner, product, cert_type, expire_date);
        if self.exists(&asset.id)? {
            return Err(CertError::already_exists(asset.id));
        }
        self.put(&asset)?;
        Ok(asset)
    }

    /// Replaces the asset under `id` with one built from the new fields.
    ///
    /// The id is re-derived from the new fields. When it changes, the
    /// removal of the old record and the write of the new one are
    /// committed as a single atomic batch. The rewritten record has
    /// `renew = false`.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::NotFound`] if `id` is absent and
    /// [`CertError::AlreadyExists`] if the new id belongs to another record.
    pub fn update(
        &self,
        id: &str,
        owner: &str,
        product: &str,
        cert_type: &str,
        expire_date: NaiveDate,
    ) -> Result<Asset, CertError> {
        if !self.exists(id)? {
            return Err(CertError::not_found(id));
        }

        let asset = Asset::new(owner, product, cert_type, expire_date);
        if asset.id == id {
            self.put(&asset)?;
            return Ok(asset);
        }
        if self.exists(&asset.id)? {
            return Err(CertError::already_exists(asset.id));
        }

        let bytes = asset.encode()?;
        self.ledger.apply(&[
            LedgerWrite::delete(id),
            LedgerWrite::put(asset.id.clone(), bytes),
        ])?;
        tracing::debug!(old_id = %id, new_id = %asset.id, "re-keyed asset");
        Ok(asset)
    }

    /// Changes the owner of the asset under `id`.
    ///
    /// The id is not re-derived, so the record stays addressable under the
    /// id its holders already know.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::NotFound`] if absent.
    pub fn transfer_owner(&self, id: &str, new_owner: &str) -> Result<Asset, CertError> {
        let mut asset = self.get(id)?;
        asset.owner = new_owner.to_string();
        self.put(&asset)?;
        Ok(asset)
    }

    /// Returns every asset in key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the scan fails or any record cannot be decoded.
    pub fn scan_all(&self) -> Result<Vec<Asset>, CertError> {
        let entries = self.ledger.scan("", "")?;
        tracing::debug!(count = entries.len(), "scanned ledger");
        entries
            .iter()
            .map(|(key, bytes)| Asset::decode(key, bytes))
            .collect()
    }

    /// Returns `true` if the ledger holds no assets.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::Ledger`] if the scan fails.
    pub fn is_empty(&self) -> Result<bool, CertError> {
        Ok(self.ledger.scan("", "")?.is_empty())
    }

    /// Writes a batch of assets atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the batch cannot be committed.
    pub fn put_all(&self, assets: &[Asset]) -> Result<(), CertError> {
        let writes = assets
            .iter()
            .map(|asset| Ok(LedgerWrite::put(asset.id.clone(), asset.encode()?)))
            .collect::<Result<Vec<_>, CertError>>()?;
        self.ledger.apply(&writes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::PENDING_SENTINEL;
    use crate::ledger::{LedgerError, MemoryLedger};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store() -> AssetStore<MemoryLedger> {
        AssetStore::new(MemoryLedger::new())
    }

    /// Gateway whose batches always fail, to pin the update crash window.
    struct FailingBatchLedger(MemoryLedger);

    impl LedgerGateway for FailingBatchLedger {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
            self.0.get(key)
        }

        fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
            self.0.put(key, value)
        }

        fn delete(&self, key: &str) -> Result<(), LedgerError> {
            self.0.delete(key)
        }

        fn scan(&self, start: &str, end: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
            self.0.scan(start, end)
        }

        fn apply(&self, _writes: &[LedgerWrite]) -> Result<(), LedgerError> {
            Err(LedgerError::Backend("injected batch failure".to_string()))
        }
    }

    #[test]
    fn test_create_and_get() {
        let store = store();
        let created = store
            .create("Mattia", "Pandoro", "D.O.P.", date(2030, 1, 1))
            .unwrap();
        assert!(!created.renew);
        assert!(store.exists(&created.id).unwrap());
        assert_eq!(store.get(&created.id).unwrap(), created);
        assert!(crate::id::is_well_formed(&created.id));
    }

    #[test]
    fn test_create_duplicate_rejected() {
        let store = store();
        store
            .create("Mattia", "Pandoro", "D.O.P.", PENDING_SENTINEL)
            .unwrap();
        let err = store
            .create("Mattia", "Pandoro", "D.O.P.", date(2030, 1, 1))
            .unwrap_err();
        assert!(matches!(err, CertError::AlreadyExists { .. }));
    }

    #[test]
    fn test_get_missing_and_corrupt() {
        let store = store();
        assert!(matches!(
            store.get("nope").unwrap_err(),
            CertError::NotFound { .. }
        ));
        assert!(store.find("nope").unwrap().is_none());

        store.ledger().put("bad", b"not json".to_vec()).unwrap();
        assert!(matches!(
            store.get("bad").unwrap_err(),
            CertError::Decode { .. }
        ));
        assert!(store.scan_all().is_err());
    }

    #[test]
    fn test_delete() {
        let store = store();
        let asset = store.create("a", "b", "c", PENDING_SENTINEL).unwrap();
        store.delete(&asset.id).unwrap();
        assert!(!store.exists(&asset.id).unwrap());
        assert!(matches!(
            store.delete(&asset.id).unwrap_err(),
            CertError::NotFound { .. }
        ));
    }

    #[test]
    fn test_update_rekeys_atomically() {
        let store = store();
        let mut original = store.create("a", "b", "c", date(2030, 1, 1)).unwrap();
        original.renew = true;
        store.put(&original).unwrap();

        let updated = store
            .update(&original.id, "a", "b2", "c", date(2031, 1, 1))
            .unwrap();
        assert_ne!(updated.id, original.id);
        assert!(!updated.renew);
        assert!(!store.exists(&original.id).unwrap());
        assert_eq!(store.get(&updated.id).unwrap(), updated);
    }

    #[test]
    fn test_update_same_fields_keeps_id() {
        let store = store();
        let original = store.create("a", "b", "c", date(2030, 1, 1)).unwrap();
        let updated = store
            .update(&original.id, "a", "b", "c", date(2032, 2, 2))
            .unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(store.get(&original.id).unwrap().expire_date, date(2032, 2, 2));
    }

    #[test]
    fn test_update_errors() {
        let store = store();
        assert!(matches!(
            store.update("nope", "a", "b", "c", PENDING_SENTINEL).unwrap_err(),
            CertError::NotFound { .. }
        ));

        let first = store.create("a", "b", "c", PENDING_SENTINEL).unwrap();
        let second = store.create("x", "y", "z", PENDING_SENTINEL).unwrap();
        let err = store
            .update(&first.id, "x", "y", "z", PENDING_SENTINEL)
            .unwrap_err();
        assert!(matches!(err, CertError::AlreadyExists { ref id } if *id == second.id));
        assert!(store.exists(&first.id).unwrap());
    }

    #[test]
    fn test_update_failed_batch_leaves_old_record() {
        let store = AssetStore::new(FailingBatchLedger(MemoryLedger::new()));
        let original = store.create("a", "b", "c", PENDING_SENTINEL).unwrap();

        let err = store
            .update(&original.id, "a", "b", "other", PENDING_SENTINEL)
            .unwrap_err();
        assert!(matches!(err, CertError::Ledger(_)));
        assert_eq!(store.get(&original.id).unwrap(), original);
        assert_eq!(store.scan_all().unwrap().len(), 1);
    }

    #[test]
    fn test_transfer_keeps_id() {
        let store = store();
        let asset = store.create("a", "b", "c", PENDING_SENTINEL).unwrap();
        let moved = store.transfer_owner(&asset.id, "new owner").unwrap();
        assert_eq!(moved.id, asset.id);
        assert_eq!(store.get(&asset.id).unwrap().owner, "new owner");
        assert!(matches!(
            store.transfer_owner("nope", "x").unwrap_err(),
            CertError::NotFound { .. }
        ));
    }

    #[test]
    fn test_put_all_and_is_empty() {
        let store = store();
        assert!(store.is_empty().unwrap());
        store
            .put_all(&[
                Asset::pending("a", "b", "c"),
                Asset::pending("d", "e", "f"),
            ])
            .unwrap();
        assert!(!store.is_empty().unwrap());
        assert_eq!(store.scan_all().unwrap().len(), 2);
    }
}
