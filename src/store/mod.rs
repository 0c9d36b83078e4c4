//! Record storage backends.
//!
//! Both backends keep records in insertion order and address them by
//! display position; neither exposes its own identity to callers.

mod json_file;
mod sqlite;

pub use json_file::JsonFileStore;
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::models::Record;

pub trait RecordStore {
    /// Short human-readable description, e.g. the file path.
    fn describe(&self) -> String;

    /// All records in insertion order.
    fn records(&self) -> Result<Vec<Record>>;

    /// Append records after the existing ones, all or nothing where the
    /// backend supports it.
    fn append(&mut self, records: &[Record]) -> Result<()>;

    /// Remove the record currently at `position`. Out of range is not an
    /// error and returns `None`.
    fn remove_at(&mut self, position: usize) -> Result<Option<Record>>;

    /// Who the ledger belongs to, where the backend records it.
    fn owner(&self) -> Option<String> {
        None
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.records()?.is_empty())
    }
}
