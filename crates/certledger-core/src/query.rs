//! Range-scan listings over the asset store.
//!
//! Results follow ledger key order; no extra sorting is applied.

use crate::asset::{Asset, AssetState};
use crate::error::CertError;
use crate::ledger::LedgerGateway;
use crate::store::AssetStore;

/// Returns every asset.
///
/// # Errors
///
/// Returns an error if the scan fails or a record cannot be decoded.
pub fn all<L: LedgerGateway>(store: &AssetStore<L>) -> Result<Vec<Asset>, CertError> {
    store.scan_all()
}

/// Returns every asset that has left the pending state, irrespective of
/// current validity.
///
/// # Errors
///
/// Returns an error if the scan fails or a record cannot be decoded.
pub fn certified<L: LedgerGateway>(store: &AssetStore<L>) -> Result<Vec<Asset>, CertError> {
    filtered(store, |asset| !asset.is_pending())
}

/// Returns pending submissions and open renewal requests: the authority's
/// work queue.
///
/// # Errors
///
/// Returns an error if the scan fails or a record cannot be decoded.
pub fn pending_or_renewal<L: LedgerGateway>(
    store: &AssetStore<L>,
) -> Result<Vec<Asset>, CertError> {
    filtered(store, |asset| asset.state().awaits_authority())
}

/// Returns assets in `state`.
///
/// # Errors
///
/// Returns an error if the scan fails or a record cannot be decoded.
pub fn in_state<L: LedgerGateway>(
    store: &AssetStore<L>,
    state: AssetState,
) -> Result<Vec<Asset>, CertError> {
    filtered(store, |asset| asset.state() == state)
}

fn filtered<L, F>(store: &AssetStore<L>, keep: F) -> Result<Vec<Asset>, CertError>
where
    L: LedgerGateway,
    F: Fn(&Asset) -> bool,
{
    let mut assets = store.scan_all()?;
    assets.retain(|asset| keep(asset));
    Ok(assets)
}
