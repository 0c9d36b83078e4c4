use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Fill in all fields: category is empty")]
    EmptyCategory,

    #[error("Fill in all fields: amount is empty")]
    EmptyAmount,

    #[error("Amount must be an integer, got '{0}'")]
    AmountNotInteger(String),

    #[error("Amount must be a positive number, got {0}")]
    AmountNotPositive(i64),

    #[error("Amount must be at most {max}, got {0}", max = crate::models::MAX_AMOUNT)]
    AmountTooLarge(i64),

    #[error("Database is unavailable; the ledger is read-only (showing the mirror file)")]
    BackendUnavailable,

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("No data to export")]
    NothingToExport,

    #[cfg(feature = "xlsx")]
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;
