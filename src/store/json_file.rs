use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::RecordStore;
use crate::error::{Result, TallyError};
use crate::models::Record;

/// Records kept as a pretty-printed JSON array. Used either as the only
/// store or as the mirror of the database.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read as a mirror: a file that no longer parses is an empty ledger.
    pub fn load(&self) -> Result<Vec<Record>> {
        match self.read() {
            Err(TallyError::Json(e)) => {
                tracing::warn!("{} is not a valid record list, treating as empty: {e}", self.path.display());
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Read as the authoritative store. A missing or blank file is empty;
    /// a malformed one is an error so it is never overwritten.
    fn read(&self) -> Result<Vec<Record>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Overwrite the whole file with `records`.
    pub fn replace_all(&self, records: &[Record]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, format!("{json}\n"))?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn records(&self) -> Result<Vec<Record>> {
        self.read()
    }

    fn append(&mut self, records: &[Record]) -> Result<()> {
        let mut all = self.read()?;
        all.extend_from_slice(records);
        self.replace_all(&all)
    }

    fn remove_at(&mut self, position: usize) -> Result<Option<Record>> {
        let mut all = self.read()?;
        if position >= all.len() {
            return Ok(None);
        }
        let removed = all.remove(position);
        self.replace_all(&all)?;
        Ok(Some(removed))
    }
}
