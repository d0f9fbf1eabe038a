//! TOML-backed host settings.
//!
//! [`SettingsHost`] is the reference [`Host`] implementation used by tests
//! and the standalone harness: configuration variables come from a flat
//! TOML table and log calls are routed to `tracing` events.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::{Host, LogLevel};

/// Flat table of string settings, as written in a measure section.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(flatten)]
    values: HashMap<String, String>,
}

impl Settings {
    /// Parses a settings table from TOML text.
    pub fn parse(data: &str) -> Result<Self> {
        toml::from_str(data).context("failed to parse settings")
    }

    /// Returns the raw value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Inserts or replaces a value. Mainly useful for tests and harnesses.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

/// Host implementation backed by a [`Settings`] table.
///
/// Relative path values are resolved against `base`, the directory holding
/// the settings file, mirroring how a widget engine resolves paths against
/// the skin folder.
pub struct SettingsHost {
    settings: Settings,
    base: PathBuf,
}

impl SettingsHost {
    pub fn new(settings: Settings, base: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            base: base.into(),
        }
    }

    /// Loads a settings file and uses its parent directory as the base for
    /// relative path values.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let settings = Settings::parse(&data)?;
        let base = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
        Ok(Self::new(settings, base))
    }
}

impl Host for SettingsHost {
    fn read_path(&self, key: &str) -> Option<PathBuf> {
        let raw = match self.settings.get(key) {
            Some(v) => v.trim(),
            None => {
                debug!(key, "Settings variable not present");
                return None;
            }
        };
        if raw.is_empty() {
            return None;
        }
        let path = Path::new(raw);
        if path.is_absolute() {
            Some(path.to_path_buf())
        } else {
            Some(self.base.join(path))
        }
    }

    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => error!("{message}"),
            LogLevel::Warning => warn!("{message}"),
            LogLevel::Notice => info!("{message}"),
            LogLevel::Debug => debug!("{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parses_flat_table() {
        let settings = Settings::parse("A = \"one\"\nB = \"two\"\n").unwrap();
        assert_eq!(settings.get("A"), Some("one"));
        assert_eq!(settings.get("B"), Some("two"));
        assert_eq!(settings.get("C"), None);
    }

    #[test]
    fn load_resolves_relative_values_against_settings_dir() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        fs::write(&path, "StatusFile = \"data/status.json\"\n").unwrap();

        let host = SettingsHost::load(&path).unwrap();
        assert_eq!(
            host.read_path("StatusFile"),
            Some(tmp.path().join("data/status.json"))
        );
    }

    #[test]
    fn absolute_values_pass_through() {
        let mut settings = Settings::default();
        settings.set("Dir", "/opt/discord");
        let host = SettingsHost::new(settings, "/elsewhere");
        assert_eq!(host.read_path("Dir"), Some(PathBuf::from("/opt/discord")));
    }

    #[test]
    fn absent_or_empty_values_read_as_none() {
        let mut settings = Settings::default();
        settings.set("Empty", "");
        settings.set("Blank", "   ");
        let host = SettingsHost::new(settings, ".");
        assert_eq!(host.read_path("Empty"), None);
        assert_eq!(host.read_path("Blank"), None);
        assert_eq!(host.read_path("Missing"), None);
    }
}
