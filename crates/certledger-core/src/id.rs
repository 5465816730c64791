//! Deterministic asset identifiers.
//!
//! An asset id is the lowercase hex SHA-256 digest of
//! `owner || 0x1F || product || 0x1F || cert_type`. The unit separator keeps
//! field boundaries unambiguous, so `("ab", "c", t)` and `("a", "bc", t)`
//! derive different ids. Every producer of ids goes through [`derive`].

use sha2::{Digest, Sha256};

/// Size of the underlying digest in bytes.
pub const DIGEST_SIZE: usize = 32;

/// Length of a derived id in hex characters.
pub const ID_LEN: usize = DIGEST_SIZE * 2;

const FIELD_SEPARATOR: u8 = 0x1f;

/// Derives the asset id for `(owner, product, cert_type)`.
#[must_use]
pub fn derive(owner: &str, product: &str, cert_type: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(owner.as_bytes());
    hasher.update([FIELD_SEPARATOR]);
    hasher.update(product.as_bytes());
    hasher.update([FIELD_SEPARATOR]);
    hasher.update(cert_type.as_bytes());
    hex::encode(hasher.finalize())
}

/// Returns `true` if `candidate` has the shape of a derived id.
#[must_use]
pub fn is_well_formed(candidate: &str) -> bool {
    candidate.len() == ID_LEN
        && candidate
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
