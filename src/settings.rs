use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TallyError};

/// Which store is authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// SQLite database, mirrored to the JSON file.
    #[default]
    Database,
    /// JSON file only.
    File,
}

/// Connection parameters. `host` is the directory holding the database file
/// (empty means the data directory), `password` keys it through SQLCipher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbSettings {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default)]
    pub user: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
}

fn default_db_name() -> String {
    "expenses".to_string()
}

impl Default for DbSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            name: default_db_name(),
            user: String::new(),
            password: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_mirror_file")]
    pub mirror_file: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub auto_bootstrap: bool,
    #[serde(default)]
    pub db: DbSettings,
}

fn default_mirror_file() -> String {
    "expenses.json".to_string()
}

fn default_currency() -> String {
    "Tenge".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            backend: Backend::default(),
            mirror_file: default_mirror_file(),
            currency: default_currency(),
            auto_bootstrap: false,
            db: DbSettings::default(),
        }
    }
}

impl Settings {
    /// Overlay `DB_HOST`, `DB_NAME`, `DB_USER` and `DB_PASS` taken from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("DB_HOST") {
            self.db.host = host;
        }
        if let Some(name) = lookup("DB_NAME").filter(|n| !n.trim().is_empty()) {
            self.db.name = name;
        }
        if let Some(user) = lookup("DB_USER") {
            self.db.user = user;
        }
        if let Some(password) = lookup("DB_PASS") {
            self.db.password = password;
        }
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn db_path(&self) -> PathBuf {
        let dir = if self.db.host.trim().is_empty() {
            self.data_path()
        } else {
            PathBuf::from(shellexpand_path(self.db.host.trim()))
        };
        let name = self.db.name.trim();
        if name.ends_with(".db") {
            dir.join(name)
        } else {
            dir.join(format!("{name}.db"))
        }
    }

    pub fn mirror_path(&self) -> PathBuf {
        // An absolute mirror_file replaces data_dir entirely.
        self.data_path().join(&self.mirror_file)
    }

    pub fn db_key(&self) -> Option<&str> {
        Some(self.db.password.as_str()).filter(|p| !p.is_empty())
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("tally")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("tally")
}

/// Settings as stored on disk, without environment overrides.
pub fn load_settings_file() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("ignoring unreadable {}: {e}", path.display());
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

/// Settings used at runtime: the stored file plus `DB_*` environment overrides.
pub fn load_settings() -> Settings {
    let mut settings = load_settings_file();
    settings.apply_env(|key| std::env::var(key).ok());
    settings
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| TallyError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn settings_file_path() -> PathBuf {
    settings_path()
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
