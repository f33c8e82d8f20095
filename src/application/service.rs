use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::domain::{Ledger, LineItem, Totals};
use crate::receipt::{ReceiptStyle, render_receipt, render_summary};
use crate::storage::ReceiptStore;

use super::AppError;

/// One billing session: the in-memory ledger plus where its receipts go.
/// This is the primary interface for any client (CLI, TUI, tests).
#[derive(Debug)]
pub struct BillingSession {
    ledger: Ledger,
    style: ReceiptStyle,
    store: ReceiptStore,
}

/// Result of importing several items at once
#[derive(Debug, Default)]
pub struct BatchResult {
    pub added: usize,
    pub rejected: Vec<(usize, AppError)>,
}

impl BillingSession {
    /// Start an empty session. Preparing the output directory happens here,
    /// once, and is reported instead of deferred to the first save.
    pub fn start(settings: &Settings) -> Result<Self, AppError> {
        let store = ReceiptStore::open(&settings.output_dir, settings.extension.as_str())
            .map_err(|source| AppError::OutputDir {
                path: settings.output_dir.clone(),
                source,
            })?;
        debug!(output_dir = %store.output_dir().display(), "billing session started");

        Ok(Self {
            ledger: Ledger::new(),
            style: ReceiptStyle::from(settings),
            store,
        })
    }

    // ========================
    // Item operations
    // ========================

    /// Validate raw input and append the item. The ledger is untouched on error.
    pub fn add_item(
        &mut self,
        name: &str,
        price: &str,
        quantity: &str,
    ) -> Result<&LineItem, AppError> {
        let item = match LineItem::parse(name, price, quantity) {
            Ok(item) => item,
            Err(e) => {
                warn!(%e, "rejected line item");
                return Err(e.into());
            }
        };
        match self.ledger.push(item) {
            Ok(item) => {
                info!(
                    item = item.name(),
                    unit_price = item.unit_price(),
                    quantity = item.quantity(),
                    "line item added"
                );
                Ok(item)
            }
            Err(e) => {
                warn!(%e, "rejected line item");
                Err(e.into())
            }
        }
    }

    /// Append several raw `(name, price, quantity)` rows, keeping valid ones.
    /// Row numbers in the result are 1-based.
    pub fn add_items<'a, I>(&mut self, rows: I) -> BatchResult
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    {
        let mut result = BatchResult::default();
        for (idx, (name, price, quantity)) in rows.into_iter().enumerate() {
            match self.add_item(name, price, quantity) {
                Ok(_) => result.added += 1,
                Err(e) => result.rejected.push((idx + 1, e)),
            }
        }
        result
    }

    pub fn items(&self) -> &[LineItem] {
        self.ledger.items()
    }

    pub fn style(&self) -> &ReceiptStyle {
        &self.style
    }

    // ========================
    // Totals and display
    // ========================

    pub fn totals(&self) -> Totals {
        let totals = self.ledger.totals();
        debug!(?totals, items = self.ledger.len(), "computed totals");
        totals
    }

    pub fn summary(&self) -> String {
        render_summary(self.ledger.items(), &self.totals(), &self.style)
    }

    /// Render the receipt text without writing it anywhere.
    pub fn render_receipt(&self, generated_at: NaiveDateTime) -> String {
        render_receipt(
            self.ledger.items(),
            &self.totals(),
            &self.style,
            generated_at,
        )
    }

    // ========================
    // Persistence
    // ========================

    /// Render and write the receipt, returning where it was written.
    ///
    /// An empty ledger is reported as [`AppError::EmptyLedger`] and nothing is
    /// written. The ledger stays intact whatever the outcome.
    pub fn save_receipt(&self, generated_at: NaiveDateTime) -> Result<PathBuf, AppError> {
        if self.ledger.is_empty() {
            return Err(AppError::EmptyLedger);
        }

        let content = self.render_receipt(generated_at);
        let path = self
            .store
            .write(&content, generated_at)
            .map_err(|source| AppError::Persistence {
                path: self.store.path_for(generated_at),
                source,
            })?;

        info!(path = %path.display(), items = self.ledger.len(), "receipt saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;

    fn session() -> (BillingSession, TempDir) {
        let temp = TempDir::new().unwrap();
        let settings = Settings::default().with_output_dir(temp.path().join("bills"));
        (BillingSession::start(&settings).unwrap(), temp)
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_start_creates_output_dir() {
        let (session, temp) = session();
        assert!(temp.path().join("bills").is_dir());
        assert!(session.items().is_empty());
    }

    #[test]
    fn test_add_item_returns_stored_item() {
        let (mut session, _temp) = session();
        let item = session.add_item("Pen", "10", "2").unwrap();
        assert_eq!(item.line_total(), 2000);
        assert_eq!(session.items().len(), 1);
    }

    #[test]
    fn test_rejected_input_leaves_ledger_unchanged() {
        let (mut session, _temp) = session();
        session.add_item("Pen", "10", "2").unwrap();

        for (name, price, qty) in [("", "5", "2"), ("Pen", "abc", "2"), ("Pen", "5", "two")] {
            let err = session.add_item(name, price, qty).unwrap_err();
            assert!(err.is_validation());
        }
        assert_eq!(session.items().len(), 1);
    }

    #[test]
    fn test_add_items_reports_bad_rows() {
        let (mut session, _temp) = session();
        let result = session.add_items([
            ("Pen", "10", "2"),
            ("", "1", "1"),
            ("Book", "50", "1"),
            ("Ink", "x", "1"),
        ]);

        assert_eq!(result.added, 2);
        let rows: Vec<usize> = result.rejected.iter().map(|(row, _)| *row).collect();
        assert_eq!(rows, vec![2, 4]);
        assert_eq!(session.totals().final_total, 6650);
    }

    #[test]
    fn test_save_empty_ledger_is_noop() {
        let (session, temp) = session();
        assert!(matches!(
            session.save_receipt(noon()),
            Err(AppError::EmptyLedger)
        ));
        let entries = std::fs::read_dir(temp.path().join("bills")).unwrap().count();
        assert_eq!(entries, 0);
    }

    #[test]
    fn test_save_collision_keeps_ledger_and_first_file() {
        let (mut session, _temp) = session();
        session.add_item("Pen", "10", "2").unwrap();

        let first = session.save_receipt(noon()).unwrap();
        let err = session.save_receipt(noon()).unwrap_err();

        match err {
            AppError::Persistence { path, source } => {
                assert_eq!(path, first);
                assert_eq!(source.kind(), std::io::ErrorKind::AlreadyExists);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(session.items().len(), 1);
    }

    #[test]
    fn test_oversized_items_are_rejected_not_summed() {
        let (mut session, _temp) = session();
        assert!(
            session
                .add_item("Gold", "90000000000000000", "1")
                .unwrap_err()
                .is_validation()
        );
        assert!(session.items().is_empty());

        session.add_item("Bar", "30000000000000000", "1").unwrap();
        let err = session
            .add_item("Bar", "30000000000000000", "1")
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(session.items().len(), 1);

        let totals = session.totals();
        assert_eq!(totals.subtotal, 3_000_000_000_000_000_000);
        assert!(session.summary().starts_with("Subtotal: ₹30000000000000000.00"));
    }
}
