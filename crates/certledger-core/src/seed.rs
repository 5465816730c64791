//! Example assets for a fresh ledger.

use chrono::NaiveDate;

use crate::asset::Asset;
use crate::error::CertError;
use crate::ledger::LedgerGateway;
use crate::store::AssetStore;

/// `(owner, product, cert_type, (year, month, day))` of each example asset.
const EXAMPLES: [(&str, &str, &str, (i32, u32, u32)); 3] = [
    ("Mattia", "Pandoro", "D.O.P.", (2023, 12, 25)),
    ("Simone", "Cotechino", "I.G.P.", (2024, 1, 1)),
    ("Antonella", "Aglianico beneventano", "D.O.C.", (2023, 4, 9)),
];

/// Returns the example assets, ids derived from their fields.
#[must_use]
pub fn example_assets() -> Vec<Asset> {
    EXAMPLES
        .iter()
        .filter_map(|&(owner, product, cert_type, (y, m, d))| {
            NaiveDate::from_ymd_opt(y, m, d)
                .map(|expire| Asset::new(owner, product, cert_type, expire))
        })
        .collect()
}

/// Writes the example assets in one batch, overwriting records with the
/// same ids.
///
/// # Errors
///
/// Returns an error if the batch cannot be committed.
pub fn init_ledger<L: LedgerGateway>(store: &AssetStore<L>) -> Result<Vec<Asset>, CertError> {
    let assets = example_assets();
    store.put_all(&assets)?;
    tracing::info!(count = assets.len(), "ledger seeded with example assets");
    Ok(assets)
}

/// Seeds the ledger only if it holds no assets.
///
/// Returns `true` if seeding happened.
///
/// # Errors
///
/// Returns an error if the emptiness check or the batch fails.
pub fn ensure_initialized<L: LedgerGateway>(store: &AssetStore<L>) -> Result<bool, CertError> {
    if !store.is_empty()? {
        tracing::debug!("ledger already initialised; skipping seed");
        return Ok(false);
    }
    init_ledger(store)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;

    #[test]
    fn test_examples() {
        let assets = example_assets();
        assert_eq!(assets.len(), 3);
        assert_eq!(assets[0].owner, "Mattia");
        assert_eq!(
            assets[0].expire_date,
            NaiveDate::from_ymd_opt(2023, 12, 25).unwrap()
        );
        assert_eq!(assets[2].product, "Aglianico beneventano");
        assert!(assets.iter().all(|a| !a.renew && !a.is_pending()));
        assert_eq!(
            assets[1].id,
            crate::id::derive("Simone", "Cotechino", "I.G.P.")
        );
    }

    #[test]
    fn test_ensure_initialized_runs_once() {
        let store = AssetStore::new(MemoryLedger::new());
        assert!(ensure_initialized(&store).unwrap());
        assert!(!ensure_initialized(&store).unwrap());
        assert_eq!(store.scan_all().unwrap().len(), 3);
    }

    #[test]
    fn test_ensure_initialized_skips_non_empty_ledger() {
        let store = AssetStore::new(MemoryLedger::new());
        store.put(&Asset::pending("a", "b", "c")).unwrap();
        assert!(!ensure_initialized(&store).unwrap());
        assert_eq!(store.scan_all().unwrap().len(), 1);
    }

    #[test]
    fn test_init_ledger_overwrites() {
        let store = AssetStore::new(MemoryLedger::new());
        let mut first = example_assets().remove(0);
        first.renew = true;
        store.put(&first).unwrap();

        init_ledger(&store).unwrap();
        assert!(!store.get(&first.id).unwrap().renew);
    }
}
