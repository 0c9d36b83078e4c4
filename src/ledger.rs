//! The ledger service.
//!
//! One store is authoritative. With the database backend the JSON file is a
//! mirror that is rewritten wholesale after every successful write; if the
//! database cannot be opened the ledger runs read-only off the mirror.

use crate::error::{Result, TallyError};
use crate::models::{NewRecord, Record, RecordDate};
use crate::reports::{self, Slice};
use crate::settings::{Backend, Settings};
use crate::store::{JsonFileStore, RecordStore, SqliteStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Reads and writes go to the authoritative store.
    Authoritative,
    /// The database could not be reached; reads come from the mirror.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Copied(usize),
    DatabaseNotEmpty,
    MirrorEmpty,
    NoMirror,
}

pub struct Ledger {
    primary: Option<Box<dyn RecordStore>>,
    mirror: Option<JsonFileStore>,
    currency: String,
}

impl Ledger {
    pub fn new(primary: Option<Box<dyn RecordStore>>, mirror: Option<JsonFileStore>) -> Self {
        Self {
            primary,
            mirror,
            currency: "Tenge".to_string(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Build the ledger the settings ask for. Never fails: an unreachable
    /// database leaves the ledger in fallback mode.
    pub fn open(settings: &Settings) -> Self {
        let mirror = JsonFileStore::new(settings.mirror_path());
        let ledger = match settings.backend {
            Backend::File => {
                tracing::debug!("using file backend at {}", mirror.path().display());
                Self::new(Some(Box::new(mirror)), None)
            }
            Backend::Database => {
                let db_path = settings.db_path();
                match SqliteStore::open(&db_path, settings.db_key()) {
                    Ok(store) => {
                        if !settings.db.user.is_empty() {
                            if let Err(e) = store.set_owner(&settings.db.user) {
                                tracing::warn!("could not record ledger owner: {e}");
                            }
                        }
                        tracing::debug!("connected to {}", db_path.display());
                        Self::new(Some(Box::new(store)), Some(mirror))
                    }
                    Err(e) => {
                        tracing::warn!(
                            "database {} unavailable, falling back to {}: {e}",
                            db_path.display(),
                            mirror.path().display()
                        );
                        Self::new(None, Some(mirror))
                    }
                }
            }
        };
        let mut ledger = ledger.with_currency(settings.currency.clone());

        if settings.auto_bootstrap && ledger.mode() == Mode::Authoritative {
            match ledger.bootstrap_from_mirror() {
                Ok(BootstrapOutcome::Copied(n)) => tracing::info!("database seeded with {n} records from mirror"),
                Ok(outcome) => tracing::debug!("bootstrap skipped: {outcome:?}"),
                Err(e) => tracing::warn!("bootstrap failed: {e}"),
            }
        }
        ledger
    }

    pub fn mode(&self) -> Mode {
        if self.primary.is_some() {
            Mode::Authoritative
        } else {
            Mode::Fallback
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn describe_primary(&self) -> Option<String> {
        self.primary.as_ref().map(|p| p.describe())
    }

    pub fn owner(&self) -> Option<String> {
        self.primary.as_ref().and_then(|p| p.owner())
    }

    pub fn mirror(&self) -> Option<&JsonFileStore> {
        self.mirror.as_ref()
    }

    fn primary_mut(&mut self) -> Result<&mut Box<dyn RecordStore>> {
        self.primary.as_mut().ok_or(TallyError::BackendUnavailable)
    }

    /// Authoritative records, else the mirror's, else nothing.
    pub fn list(&self) -> Vec<Record> {
        if let Some(primary) = &self.primary {
            match primary.records() {
                Ok(records) => return records,
                Err(e) => tracing::warn!("reading {} failed: {e}", primary.describe()),
            }
        }
        if let Some(mirror) = &self.mirror {
            match mirror.load() {
                Ok(records) => return records,
                Err(e) => tracing::warn!("reading mirror {} failed: {e}", mirror.path().display()),
            }
        }
        Vec::new()
    }

    /// Validate and append a record dated today.
    pub fn add(&mut self, category: &str, amount: &str) -> Result<Record> {
        let record = NewRecord::parse(category, amount)?.dated(RecordDate::today());
        self.primary_mut()?.append(std::slice::from_ref(&record))?;
        self.refresh_mirror();
        Ok(record)
    }

    /// Append already-validated records, keeping their dates. Returns how
    /// many were written.
    pub fn import(&mut self, records: &[Record]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        debug_assert!(records.iter().all(Record::is_valid));
        self.primary_mut()?.append(records)?;
        self.refresh_mirror();
        Ok(records.len())
    }

    /// Remove the record at a zero-based display position.
    pub fn delete(&mut self, position: usize) -> Result<Option<Record>> {
        let removed = self.primary_mut()?.remove_at(position)?;
        if removed.is_some() {
            self.refresh_mirror();
        }
        Ok(removed)
    }

    pub fn total(&self) -> i64 {
        reports::total(&self.list())
    }

    /// `(max, min)` by amount.
    pub fn min_max(&self) -> Option<(Record, Record)> {
        let records = self.list();
        reports::extremes(&records).map(|(max, min)| (max.clone(), min.clone()))
    }

    /// Case-insensitive match against each record's display line. Positions
    /// are those of the full list, so they can be passed to `delete`.
    pub fn search(&self, query: &str) -> Vec<(usize, Record)> {
        let query = query.trim().to_lowercase();
        self.list()
            .into_iter()
            .enumerate()
            .filter(|(_, r)| query.is_empty() || r.display_line(&self.currency).to_lowercase().contains(&query))
            .collect()
    }

    pub fn distribution(&self) -> Vec<Slice> {
        reports::distribution(&self.list())
    }

    /// Rewrite the mirror from the authoritative store. Returns false when
    /// there is no mirror to write.
    pub fn sync_mirror(&mut self) -> Result<bool> {
        let (Some(primary), Some(mirror)) = (&self.primary, &self.mirror) else {
            return Ok(false);
        };
        let records = primary.records()?;
        mirror.replace_all(&records)?;
        tracing::info!("mirror {} synced ({} records)", mirror.path().display(), records.len());
        Ok(true)
    }

    fn refresh_mirror(&mut self) {
        if let Err(e) = self.sync_mirror() {
            tracing::warn!("mirror sync failed, it may be stale: {e}");
        }
    }

    /// Copy the mirror into the database, but only if the database is empty.
    pub fn bootstrap_from_mirror(&mut self) -> Result<BootstrapOutcome> {
        let Some(mirror) = self.mirror.clone() else {
            return Ok(BootstrapOutcome::NoMirror);
        };
        let primary = self.primary_mut()?;
        if !primary.is_empty()? {
            return Ok(BootstrapOutcome::DatabaseNotEmpty);
        }
        let records: Vec<Record> = mirror.load()?.into_iter().filter(Record::is_valid).collect();
        if records.is_empty() {
            return Ok(BootstrapOutcome::MirrorEmpty);
        }
        primary.append(&records)?;
        self.refresh_mirror();
        Ok(BootstrapOutcome::Copied(records.len()))
    }
}
