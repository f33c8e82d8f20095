use anyhow::{Context, Result};
use std::io::Read;

use crate::application::BillingSession;
use crate::domain::LineItem;

/// Result of an import operation
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub validate_only: bool,
}

/// Importer for loading line items into a session.
///
/// Expects a header row followed by `name,price,quantity` columns.
pub struct Importer<'a> {
    session: &'a mut BillingSession,
}

impl<'a> Importer<'a> {
    pub fn new(session: &'a mut BillingSession) -> Self {
        Self { session }
    }

    /// Import items from CSV
    pub fn import_items_csv<R: Read>(
        &mut self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        if options.validate_only {
            return validate_items_csv(reader);
        }

        let session = &mut *self.session;
        for_each_row(reader, |name, price, quantity| {
            session
                .add_item(name, price, quantity)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
    }
}

/// Check every row of an item CSV without touching any session.
pub fn validate_items_csv<R: Read>(reader: R) -> Result<ImportResult> {
    for_each_row(reader, |name, price, quantity| {
        LineItem::parse(name, price, quantity)
            .map(|_| ())
            .map_err(|e| e.to_string())
    })
}

/// Feed each `name,price,quantity` record to `apply`, collecting failures
/// under the physical line the record starts on.
fn for_each_row<R, F>(mut reader: R, mut apply: F) -> Result<ImportResult>
where
    R: Read,
    F: FnMut(&str, &str, &str) -> std::result::Result<(), String>,
{
    let mut input = Vec::new();
    reader
        .read_to_end(&mut input)
        .context("Failed to read CSV input")?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input.as_slice());
    let mut imported = 0;
    let mut errors = Vec::new();

    for (line_num, result) in csv_reader.records().enumerate() {
        let fallback = line_num + 2; // +2 for header and 0-indexing

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                errors.push(ImportError {
                    line: e.position().map_or(fallback, |p| record_line(&input, p)),
                    error: format!("CSV parse error: {}", e),
                });
                continue;
            }
        };
        let line = record
            .position()
            .map_or(fallback, |p| record_line(&input, p));

        let name = record.get(0).unwrap_or("");
        let price = record.get(1).unwrap_or("");
        let quantity = record.get(2).unwrap_or("");

        match apply(name, price, quantity) {
            Ok(()) => imported += 1,
            Err(error) => errors.push(ImportError { line, error }),
        }
    }

    Ok(ImportResult { imported, errors })
}

/// A record's position points at the end of the previous one, before any
/// blank lines the reader skipped. Step over those to reach its first line.
fn record_line(input: &[u8], position: &csv::Position) -> usize {
    let start = usize::try_from(position.byte()).unwrap_or(input.len());
    let skipped = input
        .get(start..)
        .unwrap_or_default()
        .iter()
        .take_while(|b| matches!(**b, b'\r' | b'\n'))
        .filter(|b| **b == b'\n')
        .count();
    position.line() as usize + skipped
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::config::Settings;

    const CSV: &str = "name,price,quantity\n\
                       Pen,10.00,2\n\
                       ,5,1\n\
                       Book,50,1\n\
                       Ink,abc,3\n";

    fn session() -> (BillingSession, TempDir) {
        let temp = TempDir::new().unwrap();
        let settings = Settings::default().with_output_dir(temp.path());
        (BillingSession::start(&settings).unwrap(), temp)
    }

    #[test]
    fn test_import_skips_invalid_rows() {
        let (mut session, _temp) = session();
        let result = Importer::new(&mut session)
            .import_items_csv(CSV.as_bytes(), ImportOptions::default())
            .unwrap();

        assert_eq!(result.imported, 2);
        let lines: Vec<usize> = result.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 5]);
        assert_eq!(session.items().len(), 2);
        assert_eq!(session.totals().subtotal, 7000);
    }

    #[test]
    fn test_validate_only_does_not_add() {
        let (mut session, _temp) = session();
        let result = Importer::new(&mut session)
            .import_items_csv(
                CSV.as_bytes(),
                ImportOptions {
                    validate_only: true,
                },
            )
            .unwrap();

        assert_eq!(result.imported, 2);
        assert_eq!(result.errors.len(), 2);
        assert!(session.items().is_empty());
    }

    #[test]
    fn test_error_lines_count_blank_lines() {
        let (mut session, _temp) = session();
        let csv = "name,price,quantity\nPen,10,2\n\nInk,abc,1\n";
        let result = Importer::new(&mut session)
            .import_items_csv(csv.as_bytes(), ImportOptions::default())
            .unwrap();

        assert_eq!(result.imported, 1);
        let lines: Vec<usize> = result.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![4]);
    }

    #[test]
    fn test_error_lines_follow_multiline_fields() {
        let csv = "name,price,quantity\n\"Gift\nWrap\",5,1\nInk,abc,1\n";
        let result = validate_items_csv(csv.as_bytes()).unwrap();

        assert_eq!(result.imported, 1);
        assert_eq!(result.errors[0].line, 4);
    }

    #[test]
    fn test_validate_needs_no_session() {
        let result = validate_items_csv(CSV.as_bytes()).unwrap();
        assert_eq!(result.imported, 2);
        let lines: Vec<usize> = result.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 5]);
    }
}
