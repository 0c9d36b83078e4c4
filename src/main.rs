mod cli;
mod db;
mod error;
mod fmt;
mod interchange;
mod ledger;
mod logging;
mod models;
mod reports;
mod settings;
mod store;

use clap::Parser;

use cli::{Cli, Commands, SyncCommands};
use ledger::Ledger;

fn main() {
    let cli = Cli::parse();
    logging::init();

    let settings = settings::load_settings();
    let open = || Ledger::open(&settings);

    let result = match cli.command {
        Commands::Init { data_dir, backend } => cli::init::run(data_dir, backend),
        Commands::Add { category, amount } => cli::entries::add(&mut open(), &category, &amount),
        Commands::List => cli::entries::list(&open()),
        Commands::Delete { position } => cli::entries::delete(&mut open(), position),
        Commands::Total => cli::report::total(&open()),
        Commands::Stats => cli::report::stats(&open()),
        Commands::Search { query } => cli::entries::search(&open(), &query),
        Commands::Chart => cli::report::chart(&open()),
        Commands::Export { file, format } => {
            cli::transfer::export(&open(), &file, format.as_deref())
        }
        Commands::Import { file, format } => {
            cli::transfer::import(&mut open(), &file, format.as_deref())
        }
        Commands::Sync { command } => match command {
            SyncCommands::Pull => cli::sync::pull(&mut open()),
            SyncCommands::Push => cli::sync::push(&mut open()),
        },
        Commands::Status => cli::status::run(&settings, &open()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
