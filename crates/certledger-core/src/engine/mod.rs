//! Certificate lifecycle engine.
//!
//! [`CertificateEngine`] applies the certification state machine to assets
//! held in a ledger. It is stateless apart from its injected collaborators:
//! the [`AssetStore`], the [`AccessGuard`] and a [`Clock`].
//!
//! # Transitions
//!
//! | Operation             | Privileged | From              | To                    |
//! |-----------------------|------------|-------------------|-----------------------|
//! | `submit_product`      | no         | (absent)          | `Pending`             |
//! | `evaluate` (approve)  | yes        | `Pending`         | `Certified`           |
//! | `evaluate` (reject)   | yes        | `Pending`         | (deleted)             |
//! | `request_renewal`     | no         | `Certified`       | `RenewalPending`      |
//! | `renew_certificate`   | yes        | `RenewalPending`  | `Certified`           |
//! | `invalidate`          | yes        | any               | expired yesterday     |
//!
//! Privileged operations check the credential before touching the ledger,
//! so a rejected call never reads or writes anything.
//!
//! # Example
//!
//! ```rust
//! use certledger_core::clock::FixedClock;
//! use certledger_core::engine::{CertificateEngine, Evaluation};
//! use certledger_core::guard::{AccessGuard, CredentialHash};
//! use certledger_core::ledger::MemoryLedger;
//! use chrono::NaiveDate;
//!
//! # fn example() -> Result<(), certledger_core::CertError> {
//! let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! let guard = AccessGuard::new(CredentialHash::of_secret("s3cret"));
//! let engine = CertificateEngine::with_clock(MemoryLedger::new(), guard, FixedClock(today));
//!
//! let id = engine.submit_product("Mattia", "Pandoro", "D.O.P.")?;
//! assert!(!engine.verify(&id)?);
//!
//! let outcome = engine.evaluate("s3cret", &id, true)?;
//! assert!(matches!(outcome, Evaluation::Approved(_)));
//! assert!(engine.verify(&id)?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use chrono::NaiveDate;

use crate::asset::{Asset, AssetState};
use crate::clock::{Clock, SystemClock, day_before, one_period_after};
use crate::error::CertError;
use crate::guard::AccessGuard;
use crate::ledger::LedgerGateway;
use crate::query;
use crate::store::AssetStore;


/// Names of privileged operations, as reported in
/// [`CertError::Unauthorized`].
pub mod operations {
    /// Evaluation of a pending submission.
    pub const EVALUATE: &str = "evaluate";
    /// Processing of a renewal request.
    pub const RENEW_CERTIFICATE: &str = "renew_certificate";
    /// Invalidation of a certificate.
    pub const INVALIDATE: &str = "invalidate";
    /// Direct issuance with an explicit expiry.
    pub const CREATE_ASSET: &str = "create_asset";
    /// Field replacement with id re-derivation.
    pub const UPDATE_ASSET: &str = "update_asset";
    /// Physical removal of a record.
    pub const DELETE_ASSET: &str = "delete_asset";
    /// Owner change.
    pub const TRANSFER_ASSET: &str = "transfer_asset";
    /// Unfiltered listing.
    pub const LIST_ALL: &str = "list_all";
    /// The authority's work queue.
    pub const LIST_PENDING_OR_RENEWAL: &str = "list_pending_or_renewal";
}

/// Outcome of [`CertificateEngine::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// The submission was certified; carries the updated asset.
    Approved(Asset),
    /// The submission was rejected and removed; carries its id.
    Rejected(String),
}

/// The certification state machine over a ledger.
pub struct CertificateEngine<L, C = SystemClock> {
    store: AssetStore<L>,
    guard: AccessGuard,
    clock: C,
}

impl<L: LedgerGateway> CertificateEngine<L, SystemClock> {
    /// Creates an engine using the system clock.
    #[must_use]
    pub const fn new(ledger: L, guard: AccessGuard) -> Self {
        Self::with_clock(ledger, guard, SystemClock)
    }
}

impl<L: LedgerGateway, C: Clock> CertificateEngine<L, C> {
    /// Creates an engine with an explicit clock.
    #[must_use]
    pub const fn with_clock(ledger: L, guard: AccessGuard, clock: C) -> Self {
        Self {
            store: AssetStore::new(ledger),
            guard,
            clock,
        }
    }

    /// Returns the asset store.
    #[must_use]
    pub const fn store(&self) -> &AssetStore<L> {
        &self.store
    }

    /// Returns today's date according to the engine clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn authorize(&self, credential: &str, operation: &'static str) -> Result<(), CertError> {
        if self.guard.check(credential) {
            Ok(())
        } else {
            tracing::warn!(operation, "rejected privileged call: bad credential");
            Err(CertError::unauthorized(operation))
        }
    }

    /// Submits a product for certification and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::AlreadyExists`] if the same
    /// `(owner, product, cert_type)` is pending or certified.
    pub fn submit_product(
        &self,
        owner: &str,
        product: &str,
        cert_type: &str,
    ) -> Result<String, CertError> {
        let asset = Asset::pending(owner, product, cert_type);
        if self.store.exists(&asset.id)? {
            return Err(CertError::already_exists(asset.id));
        }
        self.store.put(&asset)?;
        tracing::info!(asset_id = %asset.id, state = %AssetState::Pending, "product submitted");
        Ok(asset.id)
    }

    /// Approves or rejects a pending submission.
    ///
    /// Approval sets the expiry one certification period after today;
    /// rejection deletes the record.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::Unauthorized`], [`CertError::NotFound`], or
    /// [`CertError::NotPending`] if the asset was already evaluated.
    pub fn evaluate(
        &self,
        credential: &str,
        id: &str,
        approve: bool,
    ) -> Result<Evaluation, CertError> {
        self.authorize(credential, operations::EVALUATE)?;

        let mut asset = self.store.get(id)?;
        let state = asset.state();
        if state != AssetState::Pending {
            return Err(CertError::NotPending {
                id: id.to_string(),
                state,
            });
        }

        if approve {
            asset.expire_date = one_period_after(self.today());
            self.store.put(&asset)?;
            tracing::info!(
                asset_id = %id,
                state = %asset.state(),
                expire_date = %asset.expire_date,
                "submission approved"
            );
            Ok(Evaluation::Approved(asset))
        } else {
            self.store.delete(id)?;
            tracing::info!(asset_id = %id, "submission rejected");
            Ok(Evaluation::Rejected(id.to_string()))
        }
    }

    /// Opens a renewal request on a certified asset.
    ///
    /// Requesting renewal again while one is open succeeds without writing.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::NotFound`], or [`CertError::StillPending`] if
    /// the asset was never certified.
    pub fn request_renewal(&self, id: &str) -> Result<Asset, CertError> {
        let mut asset = self.store.get(id)?;
        match asset.state() {
            AssetState::Pending => Err(CertError::StillPending { id: id.to_string() }),
            AssetState::RenewalPending => Ok(asset),
            AssetState::Certified => {
                asset.renew = true;
                self.store.put(&asset)?;
                tracing::info!(asset_id = %id, state = %asset.state(), "renewal requested");
                Ok(asset)
            },
        }
    }

    /// Processes an open renewal request.
    ///
    /// The new expiry is one certification period after the later of today
    /// and the current expiry, so renewing early never loses time.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::Unauthorized`], [`CertError::NotFound`], or
    /// [`CertError::NoRenewalRequest`] if no request is open.
    pub fn renew_certificate(&self, credential: &str, id: &str) -> Result<Asset, CertError> {
        self.authorize(credential, operations::RENEW_CERTIFICATE)?;

        let mut asset = self.store.get(id)?;
        if asset.state() != AssetState::RenewalPending {
            return Err(CertError::NoRenewalRequest { id: id.to_string() });
        }

        let base = self.today().max(asset.expire_date);
        asset.expire_date = one_period_after(base);
        asset.renew = false;
        self.store.put(&asset)?;
        tracing::info!(
            asset_id = %id,
            state = %asset.state(),
            expire_date = %asset.expire_date,
            "certificate renewed"
        );
        Ok(asset)
    }

    /// Backdates the expiry to yesterday so the certificate stops being
    /// valid. The record is kept; see [`Self::delete_asset`] for removal.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::Unauthorized`] or [`CertError::NotFound`].
    pub fn invalidate(&self, credential: &str, id: &str) -> Result<Asset, CertError> {
        self.authorize(credential, operations::INVALIDATE)?;

        let mut asset = self.store.get(id)?;
        asset.expire_date = day_before(self.today());
        self.store.put(&asset)?;
        tracing::info!(
            asset_id = %id,
            expire_date = %asset.expire_date,
            "certificate invalidated"
        );
        Ok(asset)
    }

    /// Returns `true` if the certificate exists and is valid today.
    ///
    /// A missing id is answered with `false`, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::Decode`] or [`CertError::Ledger`] if the record
    /// cannot be read.
    pub fn verify(&self, id: &str) -> Result<bool, CertError> {
        let valid = self
            .store
            .find(id)?
            .is_some_and(|asset| asset.is_valid_on(self.today()));
        tracing::debug!(asset_id = %id, valid, "certificate verified");
        Ok(valid)
    }

    /// Returns the asset under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::NotFound`] or [`CertError::Decode`].
    pub fn read_asset(&self, id: &str) -> Result<Asset, CertError> {
        self.store.get(id)
    }

    /// Issues an asset directly with an explicit expiry.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::Unauthorized`] or [`CertError::AlreadyExists`].
    pub fn create_asset(
        &self,
        credential: &str,
        owner: &str,
        product: &str,
        cert_type: &str,
        expire_date: NaiveDate,
    ) -> Result<Asset, CertError> {
        self.authorize(credential, operations::CREATE_ASSET)?;
        let asset = self.store.create(owner, product, cert_type, expire_date)?;
        tracing::info!(asset_id = %asset.id, state = %asset.state(), "asset created");
        Ok(asset)
    }

    /// Replaces the fields of an asset, re-deriving its id.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::Unauthorized`], [`CertError::NotFound`], or
    /// [`CertError::AlreadyExists`] if the new fields collide with another
    /// record.
    pub fn update_asset(
        &self,
        credential: &str,
        id: &str,
        owner: &str,
        product: &str,
        cert_type: &str,
        expire_date: NaiveDate,
    ) -> Result<Asset, CertError> {
        self.authorize(credential, operations::UPDATE_ASSET)?;
        let asset = self
            .store
            .update(id, owner, product, cert_type, expire_date)?;
        tracing::info!(old_id = %id, asset_id = %asset.id, "asset updated");
        Ok(asset)
    }

    /// Removes an asset from the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::Unauthorized`] or [`CertError::NotFound`].
    pub fn delete_asset(&self, credential: &str, id: &str) -> Result<(), CertError> {
        self.authorize(credential, operations::DELETE_ASSET)?;
        self.store.delete(id)?;
        tracing::info!(asset_id = %id, "asset deleted");
        Ok(())
    }

    /// Changes the owner of an asset. The id is kept.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::Unauthorized`] or [`CertError::NotFound`].
    pub fn transfer_asset(
        &self,
        credential: &str,
        id: &str,
        new_owner: &str,
    ) -> Result<Asset, CertError> {
        self.authorize(credential, operations::TRANSFER_ASSET)?;
        let asset = self.store.transfer_owner(id, new_owner)?;
        tracing::info!(asset_id = %id, owner = %asset.owner, "asset transferred");
        Ok(asset)
    }

    /// Lists every asset, pending or not.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::Unauthorized`] or a scan/decode error.
    pub fn list_all(&self, credential: &str) -> Result<Vec<Asset>, CertError> {
        self.authorize(credential, operations::LIST_ALL)?;
        query::all(&self.store)
    }

    /// Lists every asset that has been evaluated, valid or expired.
    ///
    /// # Errors
    ///
    /// Returns a scan/decode error.
    pub fn list_certified(&self) -> Result<Vec<Asset>, CertError> {
        query::certified(&self.store)
    }

    /// Lists pending submissions and open renewal requests.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::Unauthorized`] or a scan/decode error.
    pub fn list_pending_or_renewal(&self, credential: &str) -> Result<Vec<Asset>, CertError> {
        self.authorize(credential, operations::LIST_PENDING_OR_RENEWAL)?;
        query::pending_or_renewal(&self.store)
    }
}
