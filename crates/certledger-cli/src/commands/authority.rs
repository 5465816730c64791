//! Certifying-authority commands.
//!
//! Every command here reads the admin credential from `--credential` or
//! `CERTLEDGER_CREDENTIAL` and fails before opening the ledger if neither
//! is set.

use anyhow::Result;
use certledger_core::Evaluation;
use chrono::NaiveDate;
use serde_json::json;

use super::Context;
use super::output::{print_asset, print_assets, print_json};

/// `certledger evaluate <id> (--approve | --reject)`
pub fn evaluate(ctx: &Context, id: &str, approve: bool) -> Result<()> {
    let credential = ctx.credential()?;
    let engine = ctx.engine()?;
    match engine.evaluate(credential, id, approve)? {
        Evaluation::Approved(asset) => {
            if ctx.json() {
                print_json(&json!({ "outcome": "approved", "asset": asset }))
            } else {
                println!("Approved {}", asset.id);
                println!("  Expires: {}", asset.expire_date);
                Ok(())
            }
        },
        Evaluation::Rejected(id) => {
            if ctx.json() {
                print_json(&json!({ "outcome": "rejected", "id": id }))
            } else {
                println!("Rejected and removed {id}");
                Ok(())
            }
        },
    }
}

/// `certledger renew <id>`
pub fn renew(ctx: &Context, id: &str) -> Result<()> {
    let credential = ctx.credential()?;
    let engine = ctx.engine()?;
    let asset = engine.renew_certificate(credential, id)?;
    if ctx.json() {
        print_json(&asset)
    } else {
        println!("Renewed {}", asset.id);
        println!("  Expires: {}", asset.expire_date);
        Ok(())
    }
}

/// `certledger invalidate <id>`
pub fn invalidate(ctx: &Context, id: &str) -> Result<()> {
    let credential = ctx.credential()?;
    let engine = ctx.engine()?;
    let asset = engine.invalidate(credential, id)?;
    if ctx.json() {
        print_json(&asset)
    } else {
        println!("Invalidated {} (expired {})", asset.id, asset.expire_date);
        Ok(())
    }
}

/// `certledger pending`
pub fn pending(ctx: &Context) -> Result<()> {
    let credential = ctx.credential()?;
    let engine = ctx.engine()?;
    let assets = engine.list_pending_or_renewal(credential)?;
    print_assets(ctx.json(), &assets, engine.today())
}

/// `certledger list`
pub fn list(ctx: &Context) -> Result<()> {
    let credential = ctx.credential()?;
    let engine = ctx.engine()?;
    let assets = engine.list_all(credential)?;
    print_assets(ctx.json(), &assets, engine.today())
}

/// `certledger create <owner> <product> <cert-type> --expires <date>`
pub fn create(
    ctx: &Context,
    owner: &str,
    product: &str,
    cert_type: &str,
    expires: NaiveDate,
) -> Result<()> {
    let credential = ctx.credential()?;
    let engine = ctx.engine()?;
    let asset = engine.create_asset(credential, owner, product, cert_type, expires)?;
    print_asset(ctx.json(), &asset, engine.today())
}

/// `certledger update <id> <owner> <product> <cert-type> --expires <date>`
pub fn update(
    ctx: &Context,
    id: &str,
    owner: &str,
    product: &str,
    cert_type: &str,
    expires: NaiveDate,
) -> Result<()> {
    let credential = ctx.credential()?;
    let engine = ctx.engine()?;
    let asset = engine.update_asset(credential, id, owner, product, cert_type, expires)?;
    print_asset(ctx.json(), &asset, engine.today())
}

/// `certledger delete <id>`
pub fn delete(ctx: &Context, id: &str) -> Result<()> {
    let credential = ctx.credential()?;
    let engine = ctx.engine()?;
    engine.delete_asset(credential, id)?;
    if ctx.json() {
        print_json(&json!({ "id": id, "deleted": true }))
    } else {
        println!("Deleted {id}");
        Ok(())
    }
}

/// `certledger transfer <id> <new-owner>`
pub fn transfer(ctx: &Context, id: &str, new_owner: &str) -> Result<()> {
    let credential = ctx.credential()?;
    let engine = ctx.engine()?;
    let asset = engine.transfer_asset(credential, id, new_owner)?;
    print_asset(ctx.json(), &asset, engine.today())
}
