//! Seller commands: submission, renewal requests and lookups.
//!
//! None of these need the admin credential.

use anyhow::Result;
use serde_json::json;

use super::Context;
use super::output::{print_asset, print_assets, print_json};

/// `certledger submit <owner> <product> <cert-type>`
pub fn submit(ctx: &Context, owner: &str, product: &str, cert_type: &str) -> Result<()> {
    let engine = ctx.engine()?;
    let id = engine.submit_product(owner, product, cert_type)?;
    if ctx.json() {
        print_json(&json!({ "id": id, "state": "pending" }))
    } else {
        println!("Submitted for certification");
        println!("  ID: {id}");
        Ok(())
    }
}

/// `certledger request-renewal <id>`
pub fn request_renewal(ctx: &Context, id: &str) -> Result<()> {
    let engine = ctx.engine()?;
    let asset = engine.request_renewal(id)?;
    if ctx.json() {
        print_json(&asset)
    } else {
        println!("Renewal requested for {}", asset.id);
        Ok(())
    }
}

/// `certledger verify <id>`
///
/// An unknown id is reported as not valid rather than as an error.
pub fn verify(ctx: &Context, id: &str) -> Result<()> {
    let engine = ctx.engine()?;
    let valid = engine.verify(id)?;
    if ctx.json() {
        print_json(&json!({ "id": id, "valid": valid }))
    } else {
        println!("{}", if valid { "valid" } else { "not valid" });
        Ok(())
    }
}

/// `certledger show <id>`
pub fn show(ctx: &Context, id: &str) -> Result<()> {
    let engine = ctx.engine()?;
    let asset = engine.read_asset(id)?;
    print_asset(ctx.json(), &asset, engine.today())
}

/// `certledger certificates`
pub fn certificates(ctx: &Context) -> Result<()> {
    let engine = ctx.engine()?;
    let assets = engine.list_certified()?;
    print_assets(ctx.json(), &assets, engine.today())
}
