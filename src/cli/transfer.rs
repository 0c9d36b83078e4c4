use std::path::PathBuf;

use super::{flash_success, flash_warn};
use crate::error::Result;
use crate::interchange::Format;
use crate::ledger::Ledger;

pub fn export(ledger: &Ledger, file: &str, format: Option<&str>) -> Result<()> {
    let path = PathBuf::from(file);
    let format = Format::resolve(&path, format)?;
    format.write(&path, &ledger.list())?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string());
    flash_success(&format!("Data exported to: {name}"));
    Ok(())
}

pub fn import(ledger: &mut Ledger, file: &str, format: Option<&str>) -> Result<()> {
    let path = PathBuf::from(file);
    let format = Format::resolve(&path, format)?;
    let parsed = format.read(&path)?;

    if parsed.records.is_empty() {
        flash_warn(&format!("No valid records found in {} file!", format.name()));
        return Ok(());
    }

    let imported = ledger.import(&parsed.records)?;
    super::entries::print_ledger(ledger);
    let mut message = format!("Imported {imported} records from {}!", format.name());
    if parsed.skipped > 0 {
        message.push_str(&format!(" ({} rows skipped)", parsed.skipped));
    }
    flash_success(&message);
    Ok(())
}
