//! # certledger-core
//!
//! Certificate lifecycle engine for food-product certifications
//! (D.O.P., I.G.P., D.O.C. and similar) held in a key-value ledger.
//!
//! Sellers submit products for certification, request renewals and verify
//! certificates. A certifying authority, holding a pre-shared admin
//! credential, approves or rejects submissions, processes renewals and
//! invalidates certificates.
//!
//! ## Core Concepts
//!
//! - **Asset**: a submission or issued certificate, see [`Asset`]
//! - **Ledger**: ordered key-value world state behind [`LedgerGateway`]
//! - **Engine**: the lifecycle state machine, see [`CertificateEngine`]
//! - **Guard**: constant-time credential check, see [`AccessGuard`]
//!
//! ## Example
//!
//! ```rust
//! use certledger_core::clock::FixedClock;
//! use certledger_core::prelude::*;
//! use chrono::NaiveDate;
//!
//! # fn example() -> Result<(), CertError> {
//! let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! let guard = AccessGuard::new(CredentialHash::of_secret("s3cret"));
//! let engine = CertificateEngine::with_clock(MemoryLedger::new(), guard, FixedClock(today));
//!
//! let id = engine.submit_product("Simone", "Cotechino", "I.G.P.")?;
//! engine.evaluate("s3cret", &id, true)?;
//! engine.request_renewal(&id)?;
//! let renewed = engine.renew_certificate("s3cret", &id)?;
//! assert_eq!(renewed.state(), AssetState::Certified);
//!
//! let err = engine.invalidate("wrong", &id).unwrap_err();
//! assert_eq!(err.kind(), CertErrorKind::Unauthorized);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod asset;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod guard;
pub mod id;
pub mod ledger;
pub mod query;
pub mod report;
pub mod seed;
pub mod store;

// Re-export main types at crate root for convenience
pub use asset::{Asset, AssetState, PENDING_SENTINEL};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{CertLedgerConfig, ConfigError, LedgerBackendKind};
pub use engine::{CertificateEngine, Evaluation};
pub use error::{CertError, CertErrorKind};
pub use guard::{AccessGuard, CredentialHash, CredentialHashError};
pub use ledger::{LedgerError, LedgerGateway, LedgerWrite, MemoryLedger, SqliteLedger};
pub use store::AssetStore;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::asset::{Asset, AssetState};
    pub use crate::engine::{CertificateEngine, Evaluation};
    pub use crate::error::{CertError, CertErrorKind};
    pub use crate::guard::{AccessGuard, CredentialHash};
    pub use crate::ledger::{LedgerGateway, MemoryLedger, SqliteLedger};
}
