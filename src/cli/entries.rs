use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use super::{flash_info, flash_success, flash_warn};
use crate::error::Result;
use crate::fmt::money;
use crate::ledger::{Ledger, Mode};
use crate::models::Record;

fn records_table(rows: &[(usize, Record)]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Category", "Amount", "Date"]);
    for (position, record) in rows {
        table.add_row(vec![
            Cell::new(position),
            Cell::new(&record.category),
            Cell::new(record.amount).set_alignment(CellAlignment::Right),
            Cell::new(record.date),
        ]);
    }
    table
}

/// Full list plus total, re-read from the ledger.
pub(crate) fn print_ledger(ledger: &Ledger) {
    let rows: Vec<(usize, Record)> = ledger.list().into_iter().enumerate().collect();
    if ledger.mode() == Mode::Fallback {
        flash_warn("Database unavailable: showing the mirror file (read-only).");
    }
    if rows.is_empty() {
        println!("No expenses yet.");
    } else {
        println!("Expense List\n{}", records_table(&rows));
    }
    println!("{}", format!("Total: {}", money(ledger.total(), ledger.currency())).bold());
}

pub fn add(ledger: &mut Ledger, category: &str, amount: &str) -> Result<()> {
    let record = ledger.add(category, amount)?;
    print_ledger(ledger);
    flash_success(&format!("'{}' added!", record.category));
    Ok(())
}

pub fn list(ledger: &Ledger) -> Result<()> {
    print_ledger(ledger);
    Ok(())
}

pub fn delete(ledger: &mut Ledger, position: usize) -> Result<()> {
    match ledger.delete(position)? {
        Some(record) => {
            print_ledger(ledger);
            flash_info(&format!(
                "Deleted: {} - {}",
                record.category,
                money(record.amount, ledger.currency())
            ));
        }
        None => flash_warn(&format!("No expense at position {position}.")),
    }
    Ok(())
}

pub fn search(ledger: &Ledger, query: &str) -> Result<()> {
    let hits = ledger.search(query);
    if hits.is_empty() {
        flash_warn("Nothing found.");
        return Ok(());
    }
    println!("{}", records_table(&hits));
    Ok(())
}
