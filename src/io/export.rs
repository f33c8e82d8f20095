use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::application::BillingSession;
use crate::domain::{LineItem, Totals, format_cents};

/// Bill snapshot for JSON export
#[derive(Debug, Clone, Serialize)]
pub struct BillSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub currency_symbol: String,
    pub items: Vec<LineItem>,
    pub totals: Totals,
}

/// Exporter for converting the current bill to CSV or JSON
pub struct Exporter<'a> {
    session: &'a BillingSession,
}

impl<'a> Exporter<'a> {
    pub fn new(session: &'a BillingSession) -> Self {
        Self { session }
    }

    /// Export items to CSV format, amounts as two-decimal strings
    pub fn export_items_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["name", "unit_price", "quantity", "line_total"])?;

        let mut count = 0;
        for item in self.session.items() {
            csv_writer.write_record([
                item.name().to_string(),
                format_cents(item.unit_price()),
                item.quantity().to_string(),
                format_cents(item.line_total()),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export items and totals as a JSON snapshot
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<BillSnapshot> {
        let snapshot = BillSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            currency_symbol: self.session.style().currency_symbol.clone(),
            items: self.session.items().to_vec(),
            totals: self.session.totals(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
