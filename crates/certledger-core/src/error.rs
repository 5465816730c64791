//! Error types for certificate lifecycle operations.

use std::fmt;

use thiserror::Error;

use crate::asset::AssetState;
use crate::ledger::LedgerError;

/// Errors that can occur during certificate lifecycle operations.
///
/// Every failure is scoped to the single invocation that produced it. The
/// engine performs no local recovery or retry; callers decide what to do.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CertError {
    /// No asset is stored under the id.
    #[error("asset not found: {id}")]
    NotFound {
        /// The asset id that was not found.
        id: String,
    },

    /// An asset with the derived id is already present.
    #[error("asset already exists: {id}")]
    AlreadyExists {
        /// The id that is already taken.
        id: String,
    },

    /// The supplied credential did not match the configured hash.
    #[error("unauthorized: credential rejected for {operation}")]
    Unauthorized {
        /// The privileged operation that was refused.
        operation: &'static str,
    },

    /// Evaluation requires a pending submission.
    #[error("asset {id} is not pending evaluation (state: {state})")]
    NotPending {
        /// The asset id.
        id: String,
        /// The state the asset was found in.
        state: AssetState,
    },

    /// A renewal cannot be requested for a submission that was never
    /// evaluated.
    #[error("asset {id} is still pending evaluation")]
    StillPending {
        /// The asset id.
        id: String,
    },

    /// Renewal processing requires an open renewal request.
    #[error("asset {id} has no pending renewal request")]
    NoRenewalRequest {
        /// The asset id.
        id: String,
    },

    /// Stored bytes could not be parsed into an asset.
    #[error("cannot decode asset {id}: {source}")]
    Decode {
        /// The key whose value failed to decode.
        id: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// An asset could not be serialized for storage.
    #[error("cannot encode asset {id}: {source}")]
    Encode {
        /// The asset id.
        id: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The ledger gateway failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl CertError {
    /// Creates a new not-found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates a new already-exists error.
    #[must_use]
    pub fn already_exists(id: impl Into<String>) -> Self {
        Self::AlreadyExists { id: id.into() }
    }

    /// Creates a new unauthorized error for the named operation.
    #[must_use]
    pub const fn unauthorized(operation: &'static str) -> Self {
        Self::Unauthorized { operation }
    }

    /// Returns the coarse classification of this error.
    #[must_use]
    pub const fn kind(&self) -> CertErrorKind {
        match self {
            Self::NotFound { .. } => CertErrorKind::NotFound,
            Self::AlreadyExists { .. } => CertErrorKind::AlreadyExists,
            Self::Unauthorized { .. } => CertErrorKind::Unauthorized,
            Self::NotPending { .. } => CertErrorKind::NotPending,
            Self::StillPending { .. } => CertErrorKind::StillPending,
            Self::NoRenewalRequest { .. } => CertErrorKind::NoRenewalRequest,
            Self::Decode { .. } | Self::Encode { .. } => CertErrorKind::DecodeError,
            Self::Ledger(_) => CertErrorKind::LedgerError,
        }
    }
}

/// Stable classification of [`CertError`] for driver-facing error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertErrorKind {
    /// See [`CertError::NotFound`].
    NotFound,
    /// See [`CertError::AlreadyExists`].
    AlreadyExists,
    /// See [`CertError::Unauthorized`].
    Unauthorized,
    /// See [`CertError::NotPending`].
    NotPending,
    /// See [`CertError::StillPending`].
    StillPending,
    /// See [`CertError::NoRenewalRequest`].
    NoRenewalRequest,
    /// See [`CertError::Decode`] and [`CertError::Encode`].
    DecodeError,
    /// See [`CertError::Ledger`].
    LedgerError,
}

impl CertErrorKind {
    /// Returns the kind as a snake_case code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::Unauthorized => "unauthorized",
            Self::NotPending => "not_pending",
            Self::StillPending => "still_pending",
            Self::NoRenewalRequest => "no_renewal_request",
            Self::DecodeError => "decode_error",
            Self::LedgerError => "ledger_error",
        }
    }
}

impl fmt::Display for CertErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
