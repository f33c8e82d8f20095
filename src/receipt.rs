//! Plain-text receipt rendering and the one-line summary shown after each change.

use std::fmt::Write;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::config::Settings;
use crate::domain::{
    DISCOUNT_RATE, LineItem, ParseCentsError, TAX_RATE, Totals, format_cents, format_currency,
    parse_cents,
};

/// Longest item name printed on a receipt row.
pub const NAME_WIDTH: usize = 15;

const SEPARATOR: &str = "-----------------------------------------------";
const COLUMN_HEADER: &str = "Item Name       Price      Qty        Total";

/// Receipt timestamp, e.g. `16-10-2026 14:03:59`.
pub const DATE_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Timestamp embedded in receipt file names, e.g. `20261016_140359`.
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Presentation choices for receipts and summaries.
#[derive(Debug, Clone)]
pub struct ReceiptStyle {
    pub shop_name: String,
    pub currency_symbol: String,
    pub tax_label: String,
}

impl Default for ReceiptStyle {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for ReceiptStyle {
    fn from(settings: &Settings) -> Self {
        Self {
            shop_name: settings.shop_name.clone(),
            currency_symbol: settings.currency_symbol.clone(),
            tax_label: settings.tax_label.clone(),
        }
    }
}

impl ReceiptStyle {
    fn money(&self, cents: i64) -> String {
        format_currency(&self.currency_symbol, cents)
    }

    fn tax_line_label(&self) -> String {
        format!("{} ({})", self.tax_label, TAX_RATE)
    }

    fn discount_line_label(&self) -> String {
        format!("Discount ({})", DISCOUNT_RATE)
    }
}

/// Cut a name to at most [`NAME_WIDTH`] characters.
pub fn truncate_name(name: &str) -> &str {
    match name.char_indices().nth(NAME_WIDTH) {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}

/// One item row: name, price, quantity and line total in fixed columns.
pub fn render_row(item: &LineItem) -> String {
    format!(
        "{:<15} {:<10} {:<10} {:<10}",
        truncate_name(item.name()),
        format_cents(item.unit_price()),
        item.quantity(),
        format_cents(item.line_total()),
    )
}

/// Render the full receipt document.
pub fn render_receipt(
    items: &[LineItem],
    totals: &Totals,
    style: &ReceiptStyle,
    generated_at: NaiveDateTime,
) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "===== {} BILL RECEIPT =====", style.shop_name);
    let _ = writeln!(out, "{}", COLUMN_HEADER);
    let _ = writeln!(out, "{}", SEPARATOR);
    for item in items {
        let _ = writeln!(out, "{}", render_row(item));
    }
    let _ = writeln!(out, "{}", SEPARATOR);
    let _ = writeln!(out, "Subtotal: {}", style.money(totals.subtotal));
    let _ = writeln!(out, "{}: {}", style.tax_line_label(), style.money(totals.tax));
    let _ = writeln!(
        out,
        "{}: {}",
        style.discount_line_label(),
        style.money(totals.discount)
    );
    let _ = writeln!(out, "Final Amount: {}", style.money(totals.final_total));
    let _ = writeln!(out, "{}", SEPARATOR);
    let _ = write!(out, "Date: {}", generated_at.format(DATE_FORMAT));

    out
}

/// One-line running summary for display after each change.
pub fn render_summary(items: &[LineItem], totals: &Totals, style: &ReceiptStyle) -> String {
    if items.is_empty() {
        return "No items added yet!".to_string();
    }
    format!(
        "Subtotal: {} | {}: {} | Discount: {} | Final: {}",
        style.money(totals.subtotal),
        style.tax_label,
        style.money(totals.tax),
        style.money(totals.discount),
        style.money(totals.final_total),
    )
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReceiptParseError {
    #[error("Receipt has no '{0}' line")]
    MissingLine(String),

    #[error("Receipt line '{line}' has an unreadable amount: {reason}")]
    BadAmount {
        line: String,
        reason: ParseCentsError,
    },
}

/// Read the four totals back out of a rendered receipt.
pub fn parse_totals(receipt: &str, style: &ReceiptStyle) -> Result<Totals, ReceiptParseError> {
    let find = |label: &str| -> Result<i64, ReceiptParseError> {
        let prefix = format!("{}: ", label);
        let line = receipt
            .lines()
            .rev()
            .find(|line| line.starts_with(&prefix))
            .ok_or_else(|| ReceiptParseError::MissingLine(label.to_string()))?;
        let amount = &line[prefix.len()..];
        let amount = amount
            .strip_prefix(style.currency_symbol.as_str())
            .unwrap_or(amount);
        parse_cents(amount).map_err(|reason| ReceiptParseError::BadAmount {
            line: line.to_string(),
            reason,
        })
    };

    Ok(Totals {
        subtotal: find("Subtotal")?,
        tax: find(&style.tax_line_label())?,
        discount: find(&style.discount_line_label())?,
        final_total: find("Final Amount")?,
    })
}
