use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::{AppError, BillingSession};
use crate::config::Settings;
use crate::domain::{LineItem, format_cents};
use crate::io::{Exporter, ImportOptions, Importer, validate_items_csv};
use crate::receipt::truncate_name;

mod shell;

pub use shell::run_shell;

/// Tally - Shop Billing
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Record line items, total them with tax and discount, and save receipts")]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory receipts are written to (overrides configuration)
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive billing session
    Session,

    /// Build a bill in one go from arguments and/or a CSV file
    Bill {
        /// Item as NAME:PRICE:QTY (repeatable)
        #[arg(short, long = "item", value_name = "NAME:PRICE:QTY")]
        items: Vec<String>,

        /// CSV file with name,price,quantity columns
        #[arg(short, long)]
        from: Option<PathBuf>,

        /// Write the receipt file
        #[arg(short, long)]
        save: bool,

        /// Also export the bill to this file
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },

    /// Check a CSV item file without billing it
    Validate {
        /// CSV file with name,price,quantity columns
        file: PathBuf,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(dir) = &self.output_dir {
            settings = settings.with_output_dir(dir);
        }
        Ok(settings)
    }

    pub fn run(self) -> Result<()> {
        let settings = self.settings()?;

        match self.command {
            Commands::Session => {
                let mut session = BillingSession::start(&settings)?;
                let stdin = io::stdin();
                run_shell(&mut session, stdin.lock(), io::stdout(), local_now)?;
            }

            Commands::Bill {
                items,
                from,
                save,
                export,
                format,
            } => {
                let mut session = BillingSession::start(&settings)?;
                run_bill_command(&mut session, &items, from.as_deref(), export.as_deref(), format)?;

                if save {
                    match session.save_receipt(local_now()) {
                        Ok(path) => println!("Bill saved successfully: {}", path.display()),
                        Err(AppError::EmptyLedger) => println!("No items to save."),
                        Err(e) => return Err(e.into()),
                    }
                }
            }

            Commands::Validate { file } => run_validate_command(&file)?,

            Commands::Config => print!("{}", settings.to_toml()?),
        }

        Ok(())
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Split `NAME:PRICE:QTY` from the right so names may contain colons.
pub fn parse_item_spec(spec: &str) -> Option<(&str, &str, &str)> {
    let mut parts = spec.rsplitn(3, ':');
    let quantity = parts.next()?;
    let price = parts.next()?;
    let name = parts.next()?;
    Some((name, price, quantity))
}

fn run_bill_command(
    session: &mut BillingSession,
    specs: &[String],
    from: Option<&std::path::Path>,
    export: Option<&std::path::Path>,
    format: ExportFormat,
) -> Result<()> {
    if let Some(path) = from {
        let file = File::open(path)
            .with_context(|| format!("Failed to open input file: {}", path.display()))?;
        let result = Importer::new(session).import_items_csv(file, ImportOptions::default())?;
        for error in &result.errors {
            eprintln!("  line {}: {}", error.line, error.error);
        }
        eprintln!("Imported {} items from {}", result.imported, path.display());
    }

    let mut rows = Vec::with_capacity(specs.len());
    for spec in specs {
        let row = parse_item_spec(spec)
            .with_context(|| format!("Invalid item '{}'. Use NAME:PRICE:QTY", spec))?;
        rows.push(row);
    }
    let batch = session.add_items(rows);
    for (idx, error) in &batch.rejected {
        eprintln!("  item {}: {}", idx, error);
    }

    let mut stdout = io::stdout();
    print_items(&mut stdout, session.items())?;
    println!();
    println!("{}", session.summary());

    if let Some(path) = export {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        let exporter = Exporter::new(session);
        let count = match format {
            ExportFormat::Csv => exporter.export_items_csv(file)?,
            ExportFormat::Json => exporter.export_json(file)?.items.len(),
        };
        eprintln!("Exported {} items to {}", count, path.display());
    }

    Ok(())
}

fn run_validate_command(path: &std::path::Path) -> Result<()> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let result = validate_items_csv(file)?;

    if result.errors.is_empty() {
        println!("{} valid items", result.imported);
        return Ok(());
    }
    for error in &result.errors {
        println!("  line {}: {}", error.line, error.error);
    }
    anyhow::bail!(
        "{} invalid rows ({} valid)",
        result.errors.len(),
        result.imported
    )
}

pub(crate) fn format_item(item: &LineItem) -> String {
    format!(
        "{} x{} @ {} = {}",
        item.name(),
        item.quantity(),
        format_cents(item.unit_price()),
        format_cents(item.line_total())
    )
}

/// Print the item table, or a placeholder when the bill is empty.
pub fn print_items<W: Write>(out: &mut W, items: &[LineItem]) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "No items added yet!");
    }
    writeln!(out, "{:<16} {:>10} {:>6} {:>12}", "ITEM", "PRICE", "QTY", "TOTAL")?;
    writeln!(out, "{}", "-".repeat(47))?;
    for item in items {
        writeln!(
            out,
            "{:<16} {:>10} {:>6} {:>12}",
            truncate_name(item.name()),
            format_cents(item.unit_price()),
            item.quantity(),
            format_cents(item.line_total())
        )?;
    }
    Ok(())
}
