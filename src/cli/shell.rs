//! Interactive billing session over any line-based input.

use std::fs::File;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use crate::application::{AppError, BillingSession};
use crate::io::Exporter;

use super::print_items;

const HELP: &str = "\
Commands:
  add <name> <price> <qty>   add an item (name may contain spaces)
  add                        add an item, prompting for each field
  list                       show all items
  summary | totals           show the running totals
  save                       write the receipt file
  export <csv|json> <path>   export the current bill
  help                       show this help
  quit | exit                leave the session";

/// What the shell should do after a command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Drive a session until `quit` or end of input.
///
/// Errors from individual commands are printed and the loop keeps going;
/// only failures of the input or output streams end it early.
pub fn run_shell<R, W, C>(
    session: &mut BillingSession,
    mut input: R,
    mut out: W,
    now: C,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    C: Fn() -> NaiveDateTime,
{
    writeln!(out, "Type 'help' for commands.")?;
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = read_line(&mut input)? else {
            writeln!(out)?;
            break;
        };

        match dispatch(session, line.trim(), &mut input, &mut out, &now) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => writeln!(out, "Error: {:#}", e)?,
        }
    }
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    Ok((read > 0).then_some(line))
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<String> {
    write!(out, "{}: ", label)?;
    out.flush()?;
    let line = read_line(input)?.context("Input ended")?;
    Ok(line.trim().to_string())
}

/// Split `Blue Pen 10 2` into name, price and quantity.
fn split_add_args(args: &str) -> Option<(&str, &str, &str)> {
    let (rest, quantity) = args.trim().rsplit_once(char::is_whitespace)?;
    let (name, price) = rest.trim_end().rsplit_once(char::is_whitespace)?;
    Some((name.trim(), price, quantity))
}

fn dispatch<R, W, C>(
    session: &mut BillingSession,
    line: &str,
    input: &mut R,
    out: &mut W,
    now: &C,
) -> Result<Flow>
where
    R: BufRead,
    W: Write,
    C: Fn() -> NaiveDateTime,
{
    let (command, args) = line.split_once(' ').unwrap_or((line, ""));
    let args = args.trim();

    match command {
        "" => {}
        "help" | "?" => writeln!(out, "{}", HELP)?,
        "quit" | "exit" => return Ok(Flow::Quit),

        "add" => {
            let (name, price, quantity) = if args.is_empty() {
                (
                    prompt(input, out, "Item name")?,
                    prompt(input, out, "Price")?,
                    prompt(input, out, "Quantity")?,
                )
            } else {
                let (n, p, q) = split_add_args(args)
                    .context("Usage: add <name> <price> <qty>")?;
                (n.to_string(), p.to_string(), q.to_string())
            };

            let item = session.add_item(&name, &price, &quantity)?;
            writeln!(out, "Added: {}", super::format_item(item))?;
            writeln!(out, "{}", session.summary())?;
        }

        "list" => print_items(out, session.items())?,

        "summary" | "totals" => writeln!(out, "{}", session.summary())?,

        "save" => match session.save_receipt(now()) {
            Ok(path) => writeln!(out, "Bill saved successfully: {}", path.display())?,
            Err(AppError::EmptyLedger) => writeln!(out, "No items to save.")?,
            Err(e) => return Err(e.into()),
        },

        "export" => {
            let (format, path) = args
                .split_once(' ')
                .map(|(f, p)| (f, p.trim()))
                .context("Usage: export <csv|json> <path>")?;
            if !matches!(format, "csv" | "json") {
                anyhow::bail!("Invalid export format '{}'. Valid formats: csv, json", format);
            }

            let file =
                File::create(path).with_context(|| format!("Failed to create {}", path))?;
            let exporter = Exporter::new(session);
            let count = if format == "csv" {
                exporter.export_items_csv(file)?
            } else {
                exporter.export_json(file)?.items.len()
            };
            writeln!(out, "Exported {} items to {}", count, path)?;
        }

        other => writeln!(out, "Unknown command '{}'. Type 'help' for commands.", other)?,
    }

    Ok(Flow::Continue)
}
