use std::path::PathBuf;

use crate::error::Result;
use crate::ledger::{Ledger, Mode};
use crate::settings::{load_settings, load_settings_file, save_settings, shellexpand_path, Backend};

pub fn run(data_dir: Option<String>, backend: Option<Backend>) -> Result<()> {
    // Persist only what is on disk; DB_* overrides stay in the environment.
    let mut stored = load_settings_file();
    if let Some(dir) = data_dir {
        stored.data_dir = shellexpand_path(&dir);
    }
    if let Some(backend) = backend {
        stored.backend = backend;
    }
    save_settings(&stored)?;

    let resolved = PathBuf::from(&stored.data_dir);
    std::fs::create_dir_all(&resolved)?;
    std::fs::create_dir_all(resolved.join("exports"))?;

    let settings = load_settings();
    let mut ledger = Ledger::open(&settings);
    if ledger.mode() == Mode::Fallback {
        println!(
            "Warning: could not open {}; running off the mirror file until it is reachable.",
            settings.db_path().display()
        );
    } else if ledger.mirror().is_some_and(|m| !m.exists()) {
        ledger.sync_mirror()?;
    }

    println!("Initialized tally at {}", resolved.display());
    Ok(())
}
