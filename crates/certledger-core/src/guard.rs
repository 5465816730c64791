//! Credential check for privileged operations.
//!
//! The certifying authority holds one pre-shared credential. Only its
//! SHA-256 digest is configured; [`AccessGuard::check`] hashes a candidate
//! and compares digests in constant time.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Size of a credential digest in bytes.
pub const CREDENTIAL_HASH_SIZE: usize = 32;

/// Errors parsing a configured credential hash.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialHashError {
    /// The value is not valid hex.
    #[error("credential hash is not valid hex: {0}")]
    InvalidHex(String),

    /// The value decodes to the wrong number of bytes.
    #[error("credential hash must be {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required byte length.
        expected: usize,
        /// Decoded byte length.
        actual: usize,
    },
}

/// SHA-256 digest of the admin credential.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash([u8; CREDENTIAL_HASH_SIZE]);

impl CredentialHash {
    /// Hashes a plaintext credential.
    #[must_use]
    pub fn of_secret(secret: &str) -> Self {
        Self(Sha256::digest(secret.as_bytes()).into())
    }

    /// Parses a hex-encoded digest (either case).
    ///
    /// # Errors
    ///
    /// Returns an error if `hex_digest` is not 32 bytes of hex.
    pub fn from_hex(hex_digest: &str) -> Result<Self, CredentialHashError> {
        let bytes =
            hex::decode(hex_digest.trim()).map_err(|e| CredentialHashError::InvalidHex(e.to_string()))?;
        let digest: [u8; CREDENTIAL_HASH_SIZE] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| CredentialHashError::InvalidLength {
                    expected: CREDENTIAL_HASH_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self(digest))
    }

    /// Returns the digest as lowercase hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Compares two digests in constant time.
    #[must_use]
    pub fn ct_matches(&self, other: &Self) -> bool {
        bool::from(self.0[..].ct_eq(&other.0[..]))
    }
}

impl FromStr for CredentialHash {
    type Err = CredentialHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// Only an 8-character prefix is printed.
impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "CredentialHash({}..)", &hex[..8])
    }
}

/// Gate in front of every privileged engine operation.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    expected: CredentialHash,
}

impl AccessGuard {
    /// Creates a guard accepting the credential whose digest is `expected`.
    #[must_use]
    pub const fn new(expected: CredentialHash) -> Self {
        Self { expected }
    }

    /// Returns `true` if `candidate` hashes to the configured digest.
    #[must_use]
    pub fn check(&self, candidate: &str) -> bool {
        CredentialHash::of_secret(candidate).ct_matches(&self.expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD123_SHA256: &str =
        "ef92b778bafe771e89245b89ecbc08a44a4e166c06659911881f383d4473e94f";

    #[test]
    fn test_of_secret_matches_known_digest() {
        assert_eq!(
            CredentialHash::of_secret("password123").to_hex(),
            PASSWORD123_SHA256
        );
    }

    #[test]
    fn test_check() {
        let guard = AccessGuard::new(CredentialHash::from_hex(PASSWORD123_SHA256).unwrap());
        assert!(guard.check("password123"));
        assert!(!guard.check("password124"));
        assert!(!guard.check(""));
    }

    #[test]
    fn test_from_hex_accepts_uppercase() {
        let upper = PASSWORD123_SHA256.to_uppercase();
        let parsed: CredentialHash = upper.parse().unwrap();
        assert_eq!(parsed.to_hex(), PASSWORD123_SHA256);
    }

    #[test]
    fn test_from_hex_errors() {
        assert!(matches!(
            CredentialHash::from_hex("zz"),
            Err(CredentialHashError::InvalidHex(_))
        ));
        assert_eq!(
            CredentialHash::from_hex("abcd"),
            Err(CredentialHashError::InvalidLength {
                expected: 32,
                actual: 2
            })
        );
    }

    #[test]
    fn test_debug_is_truncated() {
        let hash = CredentialHash::of_secret("password123");
        assert_eq!(format!("{hash:?}"), "CredentialHash(ef92b778..)");
    }
}
