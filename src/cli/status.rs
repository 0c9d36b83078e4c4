use crate::error::Result;
use crate::fmt::money;
use crate::ledger::{Ledger, Mode};
use crate::settings::{settings_file_path, Backend, Settings};

pub fn run(settings: &Settings, ledger: &Ledger) -> Result<()> {
    let backend = match settings.backend {
        Backend::Database => "database",
        Backend::File => "file",
    };
    let mode = match ledger.mode() {
        Mode::Authoritative => "connected",
        Mode::Fallback => "fallback (read-only mirror)",
    };

    println!("Settings:   {}", settings_file_path().display());
    println!("Data dir:   {}", settings.data_dir);
    println!("Backend:    {backend}");
    println!("Mode:       {mode}");
    if settings.backend == Backend::Database {
        println!("Database:   {}", settings.db_path().display());
        println!("Encrypted:  {}", if settings.db_key().is_some() { "yes" } else { "no" });
        if ledger.mode() == Mode::Authoritative {
            let owner = ledger.owner();
            println!("Owner:      {}", owner.as_deref().unwrap_or("(not set)"));
        }
    }
    match ledger.mirror() {
        Some(mirror) => {
            let state = if mirror.exists() { "" } else { " (not written yet)" };
            println!("Mirror:     {}{state}", mirror.path().display());
        }
        None => println!("Store:      {}", ledger.describe_primary().unwrap_or_default()),
    }

    println!();
    println!("Expenses:   {}", ledger.list().len());
    println!("Total:      {}", money(ledger.total(), ledger.currency()));
    Ok(())
}
