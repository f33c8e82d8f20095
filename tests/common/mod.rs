// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use tally::BillingSession;
use tally::config::Settings;
use tempfile::TempDir;

/// Helper to create a session writing into a temporary directory
pub fn test_session() -> Result<(BillingSession, TempDir)> {
    let temp_dir = TempDir::new()?;
    let settings = Settings::default().with_output_dir(temp_dir.path().join("bills"));
    let session = BillingSession::start(&settings)?;
    Ok((session, temp_dir))
}

/// Helper to build a fixed timestamp from "YYYY-MM-DD HH:MM:SS"
pub fn at(stamp: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").unwrap()
}

pub fn midnight(date_str: &str) -> NaiveDateTime {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Test fixture: the pen and book bill (subtotal 70.00)
pub fn add_pen_and_book(session: &mut BillingSession) -> Result<()> {
    session.add_item("Pen", "10.00", "2")?;
    session.add_item("Book", "50.00", "1")?;
    Ok(())
}
