use super::{flash_info, flash_success, flash_warn};
use crate::error::Result;
use crate::ledger::{BootstrapOutcome, Ledger};

pub fn pull(ledger: &mut Ledger) -> Result<()> {
    match ledger.bootstrap_from_mirror()? {
        BootstrapOutcome::Copied(n) => flash_success(&format!("Database seeded with {n} records from the mirror file.")),
        BootstrapOutcome::DatabaseNotEmpty => flash_info("Database already has data, skipping mirror import."),
        BootstrapOutcome::MirrorEmpty => flash_warn("No mirror data to copy into the database."),
        BootstrapOutcome::NoMirror => flash_warn("The file backend has no mirror to pull from."),
    }
    Ok(())
}

pub fn push(ledger: &mut Ledger) -> Result<()> {
    if ledger.sync_mirror()? {
        let path = ledger
            .mirror()
            .map(|m| m.path().display().to_string())
            .unwrap_or_default();
        flash_success(&format!("Mirror {path} synced from the database."));
    } else {
        flash_warn("Nothing to sync: no database or no mirror configured.");
    }
    Ok(())
}
