//! Human-readable rendering of assets.
//!
//! [`render_table`] lays out typed [`Asset`] values in aligned columns;
//! validity is computed against the supplied date, never stored.

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::asset::Asset;

const HEADERS: [&str; 7] = ["ID", "OWNER", "PRODUCT", "TYPE", "EXPIRES", "RENEW", "STATUS"];

/// Message rendered in place of an empty table.
pub const EMPTY_MESSAGE: &str = "No assets";

/// Validity label of `asset` on `today`.
#[must_use]
pub fn status_label(asset: &Asset, today: NaiveDate) -> &'static str {
    if asset.is_pending() {
        "pending"
    } else if asset.is_valid_on(today) {
        "valid"
    } else {
        "expired"
    }
}

fn row(asset: &Asset, today: NaiveDate) -> [String; 7] {
    let expires = if asset.is_pending() {
        "-".to_string()
    } else {
        asset.expire_date.to_string()
    };
    [
        asset.id.clone(),
        asset.owner.clone(),
        asset.product.clone(),
        asset.cert_type.clone(),
        expires,
        if asset.renew { "yes" } else { "no" }.to_string(),
        status_label(asset, today).to_string(),
    ]
}

/// Renders `assets` as an aligned table with a header row.
///
/// An empty slice renders [`EMPTY_MESSAGE`].
#[must_use]
pub fn render_table(assets: &[Asset], today: NaiveDate) -> String {
    if assets.is_empty() {
        return format!("{EMPTY_MESSAGE}\n");
    }

    let rows: Vec<[String; 7]> = assets.iter().map(|a| row(a, today)).collect();
    let mut widths = HEADERS.map(|h| h.chars().count());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(str::to_string), &widths);
    let total = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    out.push_str(&"-".repeat(total));
    out.push('\n');
    for cells in &rows {
        push_line(&mut out, cells, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    let mut line = String::new();
    for (i, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        // Writing to a String cannot fail.
        let _ = write!(line, "{cell:<width$}");
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
