pub mod entries;
pub mod init;
pub mod report;
pub mod status;
pub mod sync;
pub mod transfer;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::settings::Backend;

pub(crate) fn flash_success(message: &str) {
    println!("{}", message.green());
}

pub(crate) fn flash_info(message: &str) {
    println!("{}", message.blue());
}

pub(crate) fn flash_warn(message: &str) {
    println!("{}", message.yellow());
}

#[derive(Parser)]
#[command(name = "tally", about = "Personal expense tracker.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up tally: choose a data directory and initialize the ledger.
    Init {
        /// Path for tally data (default: ~/Documents/tally)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Authoritative store
        #[arg(long, value_enum)]
        backend: Option<Backend>,
    },
    /// Add an expense dated today.
    Add {
        /// Expense category, e.g. 'Food'
        category: String,
        /// Whole amount, e.g. 1500
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Show all expenses and the running total.
    List,
    /// Delete the expense at a position shown by `tally list`.
    Delete {
        /// Zero-based position
        position: usize,
    },
    /// Show the total of all expenses.
    Total,
    /// Show the largest and smallest expense.
    Stats,
    /// Find expenses whose line contains the query (case-insensitive).
    Search {
        query: String,
    },
    /// Chart expense distribution by category.
    Chart,
    /// Export all expenses to a CSV or XLSX file.
    Export {
        /// Output file path
        file: String,
        /// Override format detection: csv, xlsx
        #[arg(long)]
        format: Option<String>,
    },
    /// Import expenses from a CSV or spreadsheet file.
    Import {
        /// Path to CSV or XLSX file to import
        file: String,
        /// Override format detection: csv, xlsx
        #[arg(long)]
        format: Option<String>,
    },
    /// Synchronize the database and the mirror file.
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },
    /// Show settings, active backend and record count.
    Status,
}

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Seed an empty database from the mirror file.
    Pull,
    /// Overwrite the mirror file from the database.
    Push,
}
