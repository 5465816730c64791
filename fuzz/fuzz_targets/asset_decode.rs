//! Fuzz harness for `Asset::decode`.
//!
//! Arbitrary ledger values must either decode or fail with an error, never
//! panic. Anything that decodes must re-encode to bytes that decode to the
//! same asset.

#![no_main]
use certledger_core::Asset;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(asset) = Asset::decode("fuzz", data) else {
        return;
    };
    let _ = asset.state();
    let _ = asset.to_string();

    let encoded = asset.encode().expect("decoded asset must encode");
    let again = Asset::decode("fuzz", &encoded).expect("re-encoded asset must decode");
    assert_eq!(asset, again);
});
