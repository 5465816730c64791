//! Ledger setup commands.

use anyhow::Result;
use certledger_core::{CredentialHash, seed};
use serde_json::json;

use super::Context;
use super::output::print_json;

/// `certledger init`
///
/// Opens (and so creates) the configured ledger. When seeding is enabled
/// and the ledger is empty, the example assets are loaded.
pub fn init(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    let engine = ctx.engine_from(&config)?;

    let seeded = if config.seed.enabled {
        seed::ensure_initialized(engine.store())?
    } else {
        false
    };

    if ctx.json() {
        print_json(&json!({
            "backend": config.ledger.backend.to_string(),
            "seeded": seeded,
        }))
    } else {
        if seeded {
            println!("Ledger initialised with example assets");
        } else {
            println!("Ledger ready");
        }
        Ok(())
    }
}

/// `certledger hash-credential`
///
/// Does not read the configuration file.
pub fn hash_credential(ctx: &Context) -> Result<()> {
    let hash = CredentialHash::of_secret(ctx.credential()?).to_hex();
    if ctx.json() {
        print_json(&json!({ "admin_credential_hash": hash }))
    } else {
        println!("{hash}");
        Ok(())
    }
}
