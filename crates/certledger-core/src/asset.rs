//! Asset record and lifecycle state.
//!
//! An [`Asset`] is a certification record: either a submission waiting for
//! evaluation or an issued certificate. The record is persisted as compact
//! JSON with a fixed field order (`ID`, `Owner`, `Product`, `CertType`,
//! `ExpireDate`, `Renew`) so that independent writers produce identical
//! bytes for the same asset.
//!
//! # States
//!
//! ```text
//! submit --> PENDING --evaluate(approve)--> CERTIFIED <--renew-- RENEWAL_PENDING
//!               |                               |                    ^
//!               +--evaluate(reject)--> deleted  +--request_renewal---+
//! ```
//!
//! Validity is derived from the expiry date and never stored.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CertError;
use crate::id;

/// Expiry date marking a submission that has not been evaluated yet.
pub const PENDING_SENTINEL: NaiveDate = match NaiveDate::from_ymd_opt(1980, 1, 1) {
    Some(date) => date,
    None => panic!("pending sentinel must be a valid date"),
};

/// A certification record stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Derived identifier, see [`id::derive`].
    #[serde(rename = "ID")]
    pub id: String,

    /// Name of the submitting party.
    #[serde(rename = "Owner")]
    pub owner: String,

    /// Product name.
    #[serde(rename = "Product")]
    pub product: String,

    /// Certification category label (e.g. `D.O.P.`).
    #[serde(rename = "CertType")]
    pub cert_type: String,

    /// Expiry date, or [`PENDING_SENTINEL`] while pending.
    #[serde(rename = "ExpireDate")]
    pub expire_date: NaiveDate,

    /// Whether a renewal has been requested and not yet processed.
    #[serde(rename = "Renew")]
    pub renew: bool,
}

impl Asset {
    /// Creates an asset with a derived id and `renew = false`.
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        product: impl Into<String>,
        cert_type: impl Into<String>,
        expire_date: NaiveDate,
    ) -> Self {
        let owner = owner.into();
        let product = product.into();
        let cert_type = cert_type.into();
        Self {
            id: id::derive(&owner, &product, &cert_type),
            owner,
            product,
            cert_type,
            expire_date,
            renew: false,
        }
    }

    /// Creates a submission awaiting evaluation.
    #[must_use]
    pub fn pending(
        owner: impl Into<String>,
        product: impl Into<String>,
        cert_type: impl Into<String>,
    ) -> Self {
        Self::new(owner, product, cert_type, PENDING_SENTINEL)
    }

    /// Returns the lifecycle state of this asset.
    #[must_use]
    pub fn state(&self) -> AssetState {
        if self.is_pending() {
            AssetState::Pending
        } else if self.renew {
            AssetState::RenewalPending
        } else {
            AssetState::Certified
        }
    }

    /// Returns `true` if the asset has not been evaluated.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.expire_date == PENDING_SENTINEL
    }

    /// Returns `true` if the certificate is valid on `today`.
    ///
    /// The expiry must be strictly after `today`; a certificate expiring
    /// today is no longer valid.
    #[must_use]
    pub fn is_valid_on(&self, today: NaiveDate) -> bool {
        !self.is_pending() && self.expire_date > today
    }

    /// Serializes the asset to its canonical ledger bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::Encode`] if serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>, CertError> {
        serde_json::to_vec(self).map_err(|source| CertError::Encode {
            id: self.id.clone(),
            source,
        })
    }

    /// Parses ledger bytes stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::Decode`] if the bytes are not a valid asset.
    pub fn decode(key: &str, bytes: &[u8]) -> Result<Self, CertError> {
        serde_json::from_slice(bytes).map_err(|source| CertError::Decode {
            id: key.to_string(),
            source,
        })
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | ",
            self.id, self.owner, self.product, self.cert_type
        )?;
        if self.is_pending() {
            f.write_str("pending")?;
        } else {
            write!(f, "expires {}", self.expire_date)?;
        }
        if self.renew {
            f.write_str(" | renewal requested")?;
        }
        Ok(())
    }
}

/// Lifecycle state of an [`Asset`].
///
/// Expired certificates are still `Certified`: validity is a predicate over
/// the expiry date, not a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetState {
    /// Submitted, not yet evaluated.
    Pending,
    /// Evaluated and issued, no open renewal request.
    Certified,
    /// Issued with an open renewal request.
    RenewalPending,
}

impl AssetState {
    /// Returns the state as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Certified => "certified",
            Self::RenewalPending => "renewal_pending",
        }
    }

    /// Returns `true` if the authority has work to do on this asset.
    #[must_use]
    pub const fn awaits_authority(&self) -> bool {
        matches!(self, Self::Pending | Self::RenewalPending)
    }
}

impl fmt::Display for AssetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
