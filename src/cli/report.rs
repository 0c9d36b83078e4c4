use chrono::Datelike;
use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use super::{flash_info, flash_warn};
use crate::error::Result;
use crate::fmt::{bar, money};
use crate::ledger::Ledger;

const BAR_WIDTH: usize = 30;

pub fn total(ledger: &Ledger) -> Result<()> {
    println!("{}", format!("Total: {}", money(ledger.total(), ledger.currency())).bold());
    Ok(())
}

pub fn stats(ledger: &Ledger) -> Result<()> {
    let Some((max, min)) = ledger.min_max() else {
        flash_warn("No data found.");
        return Ok(());
    };
    let currency = ledger.currency();
    flash_info(&format!(
        "Max: {} ({})  |  Min: {} ({})",
        max.category,
        money(max.amount, currency),
        min.category,
        money(min.amount, currency)
    ));
    Ok(())
}

pub fn chart(ledger: &Ledger) -> Result<()> {
    let slices = ledger.distribution();
    if slices.is_empty() {
        flash_warn("No data to show chart.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "%", ""]);
    for slice in &slices {
        table.add_row(vec![
            Cell::new(&slice.category),
            Cell::new(money(slice.total, ledger.currency())).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", slice.pct)).set_alignment(CellAlignment::Right),
            Cell::new(bar(slice.pct, BAR_WIDTH).cyan()),
        ]);
    }
    let year = chrono::Local::now().year();
    println!("Expense Distribution by Category - {year}\n{table}");
    Ok(())
}
