//! Text and JSON rendering of command results.

use certledger_core::report;
use certledger_core::{Asset, CertError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

impl ErrorResponse {
    /// Builds a response from any command error. Engine errors keep their
    /// stable kind; everything else is reported as `error`.
    pub fn from_error(err: &anyhow::Error) -> Self {
        let code = err
            .downcast_ref::<CertError>()
            .map_or("error", |e| e.kind().as_str());
        Self {
            code: code.to_string(),
            message: format!("{err:#}"),
        }
    }
}

/// Prints a command failure to stderr.
pub fn print_error(json: bool, err: &anyhow::Error) {
    if json {
        let response = ErrorResponse::from_error(err);
        eprintln!(
            "{}",
            serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        eprintln!("Error: {err:#}");
    }
}

/// Prints any serializable value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints a single asset.
pub fn print_asset(json: bool, asset: &Asset, today: NaiveDate) -> anyhow::Result<()> {
    if json {
        return print_json(asset);
    }
    println!("ID:        {}", asset.id);
    println!("Owner:     {}", asset.owner);
    println!("Product:   {}", asset.product);
    println!("Type:      {}", asset.cert_type);
    if asset.is_pending() {
        println!("Expires:   -");
    } else {
        println!("Expires:   {}", asset.expire_date);
    }
    println!("State:     {}", asset.state());
    println!("Renewal:   {}", if asset.renew { "requested" } else { "none" });
    println!("Status:    {}", report::status_label(asset, today));
    Ok(())
}

/// Prints a list of assets as a table or JSON array.
pub fn print_assets(json: bool, assets: &[Asset], today: NaiveDate) -> anyhow::Result<()> {
    if json {
        return print_json(&assets);
    }
    print!("{}", report::render_table(assets, today));
    Ok(())
}
