//! Application configuration stored as `<home>/config/config.json`.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::{OrganizerError, Result};
use crate::storage::json_backend::{tmp_path, write_atomic};
use crate::utils::paths::{self, ensure_dir};

const CONFIG_FILE: &str = "config.json";
const BACKUP_DIR: &str = "backups";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_STAMP: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub currency: String,
    pub locale: String,
    pub overview_debounce_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_quota_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "PHP".into(),
            locale: "en-PH".into(),
            overview_debounce_ms: 100,
            storage_quota_bytes: None,
            data_dir: None,
        }
    }
}

impl Config {
    pub fn overview_debounce(&self) -> Duration {
        Duration::from_millis(self.overview_debounce_ms)
    }

    /// Directory of the key-value files, honouring the `data_dir` override.
    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| paths::data_dir_in(base))
    }
}

/// Display theme, kept in the key-value store rather than the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

impl FromStr for Theme {
    type Err = OrganizerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(OrganizerError::Config(format!("unknown theme `{other}`"))),
        }
    }
}

/// Loads, saves and snapshots the configuration file.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: impl Into<PathBuf>) -> Result<Self> {
        let base = base.into();
        let config_root = paths::config_dir_in(&base);
        let backups_dir = config_root.join(BACKUP_DIR);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            path: config_root.join(CONFIG_FILE),
            base,
            backups_dir,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file yields the defaults; a malformed one is a config error.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            OrganizerError::Config(format!("{}: {err}", self.path.display()))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "saved config");
        Ok(())
    }

    /// Writes a timestamped copy of `config` and returns its file name.
    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String> {
        let mut name = format!("config_{}", Utc::now().format(BACKUP_STAMP));
        if let Some(label) = note.and_then(slug) {
            name.push('_');
            name.push_str(&label);
        }
        name.push('.');
        name.push_str(BACKUP_EXTENSION);
        write_atomic(
            &self.backups_dir.join(&name),
            &serde_json::to_string_pretty(config)?,
        )?;
        Ok(name)
    }

    /// Backup file names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort_by(|a, b| backup_time(b).cmp(&backup_time(a)).then_with(|| b.cmp(a)));
        Ok(names)
    }

    pub fn restore(&self, name: &str) -> Result<Config> {
        let path = self.backups_dir.join(name);
        if !path.exists() {
            return Err(OrganizerError::NotFound(format!(
                "configuration backup `{name}`"
            )));
        }
        let config: Config = serde_json::from_str(&fs::read_to_string(&path)?)?;
        self.save(&config)?;
        Ok(config)
    }
}

fn slug(note: &str) -> Option<String> {
    let mut out = String::new();
    for ch in note.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    let out = out.trim_end_matches('-').to_string();
    (!out.is_empty()).then_some(out)
}

fn backup_time(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_prefix("config_")?;
    let stamp = stem.get(..15)?;
    NaiveDateTime::parse_from_str(stamp, BACKUP_STAMP)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.currency, "PHP");
        assert_eq!(config.overview_debounce(), Duration::from_millis(100));
    }

    #[test]
    fn save_backup_and_restore() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path()).unwrap();
        let mut config = Config {
            currency: "USD".into(),
            ..Config::default()
        };
        manager.save(&config).unwrap();
        let name = manager.backup(&config, Some("Before quota!")).unwrap();
        assert!(name.ends_with("_before-quota.json"), "{name}");

        config.storage_quota_bytes = Some(1024);
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap().storage_quota_bytes, Some(1024));

        assert_eq!(manager.list_backups().unwrap(), vec![name.clone()]);
        let restored = manager.restore(&name).unwrap();
        assert_eq!(restored.storage_quota_bytes, None);
        assert_eq!(manager.load().unwrap().currency, "USD");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path()).unwrap();
        fs::write(manager.path(), r#"{"currency":"EUR"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.locale, "en-PH");
    }

    #[test]
    fn theme_parses_and_toggles() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
    }
}
