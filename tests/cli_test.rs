use std::fs;

use anyhow::Result;
use clap::Parser;
use tally::cli::Cli;
use tempfile::TempDir;

fn receipts_in(dir: &std::path::Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().to_string());
    }
    Ok(names)
}

#[test]
fn test_bill_command_saves_receipt() -> Result<()> {
    let temp = TempDir::new()?;
    let out_dir = temp.path().join("receipts");

    let cli = Cli::try_parse_from([
        "tally",
        "--output-dir",
        out_dir.to_str().unwrap(),
        "bill",
        "--item",
        "Pen:10:2",
        "--item",
        "Book:50:1",
        "--save",
    ])?;
    cli.run()?;

    let names = receipts_in(&out_dir)?;
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("Bill_"));
    assert!(names[0].ends_with(".txt"));

    let content = fs::read_to_string(out_dir.join(&names[0]))?;
    assert!(content.contains("Final Amount: ₹66.50"));

    Ok(())
}

#[test]
fn test_bill_command_without_save_writes_nothing() -> Result<()> {
    let temp = TempDir::new()?;
    let out_dir = temp.path().join("receipts");

    let cli = Cli::try_parse_from([
        "tally",
        "-o",
        out_dir.to_str().unwrap(),
        "bill",
        "-i",
        "Pen:10:2",
    ])?;
    cli.run()?;

    assert!(receipts_in(&out_dir)?.is_empty());

    Ok(())
}

#[test]
fn test_bill_command_from_csv_with_export() -> Result<()> {
    let temp = TempDir::new()?;
    let out_dir = temp.path().join("receipts");
    let input = temp.path().join("items.csv");
    let export = temp.path().join("bill.json");
    fs::write(&input, "name,price,quantity\nPen,10,2\nBook,50,1\n")?;

    let cli = Cli::try_parse_from([
        "tally",
        "-o",
        out_dir.to_str().unwrap(),
        "bill",
        "--from",
        input.to_str().unwrap(),
        "--export",
        export.to_str().unwrap(),
        "--format",
        "json",
    ])?;
    cli.run()?;

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&export)?)?;
    assert_eq!(value["totals"]["final_total"], 6650);

    Ok(())
}

#[test]
fn test_malformed_item_spec_is_an_error() -> Result<()> {
    let temp = TempDir::new()?;

    let cli = Cli::try_parse_from([
        "tally",
        "-o",
        temp.path().to_str().unwrap(),
        "bill",
        "-i",
        "Pen-10-2",
    ])?;
    assert!(cli.run().is_err());

    Ok(())
}

#[test]
fn test_validate_command() -> Result<()> {
    let temp = TempDir::new()?;
    let good = temp.path().join("good.csv");
    let bad = temp.path().join("bad.csv");
    fs::write(&good, "name,price,quantity\nPen,10,2\n")?;
    fs::write(&bad, "name,price,quantity\nPen,ten,2\n")?;
    let out_dir = temp.path().join("receipts");

    let ok = Cli::try_parse_from([
        "tally",
        "-o",
        out_dir.to_str().unwrap(),
        "validate",
        good.to_str().unwrap(),
    ])?;
    assert!(ok.run().is_ok());

    let failing = Cli::try_parse_from([
        "tally",
        "-o",
        out_dir.to_str().unwrap(),
        "validate",
        bad.to_str().unwrap(),
    ])?;
    assert!(failing.run().is_err());
    assert!(!out_dir.exists());

    Ok(())
}
