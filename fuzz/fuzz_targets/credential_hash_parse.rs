//! Fuzz harness for `CredentialHash::from_hex`.
//!
//! Configured hashes come from a file the operator edits by hand; parsing
//! must reject anything that is not 32 bytes of hex without panicking.

#![no_main]
use certledger_core::CredentialHash;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(hash) = CredentialHash::from_hex(text) {
        assert_eq!(hash.to_hex(), text.trim().to_ascii_lowercase());
    }
});
