//! Tool settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const APP_DIR: &str = "hpdtool";
const SETTINGS_FILE: &str = "settings.json";

/// Errors while saving settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not determine settings path")]
    NoConfigDir,

    #[error("failed to create settings directory: {0}")]
    CreateDir(#[source] std::io::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write settings: {0}")]
    Write(#[source] std::io::Error),
}

/// Persisted tool settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Re-parse exported text before writing it
    #[serde(default = "default_true")]
    pub verify_round_trip: bool,
    /// Default catalog CSV for `xref`
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

fn default_log_filter() -> String {
    "hpdtool=info,hpd_format=info,hpd_catalog=info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            verify_round_trip: true,
            catalog: None,
        }
    }
}

impl Settings {
    /// Uses $XDG_CONFIG_HOME/hpdtool, falls back to ~/.config/hpdtool
    fn config_dir() -> Option<PathBuf> {
        resolve_config_dir(std::env::var_os("XDG_CONFIG_HOME"), dirs::home_dir())
    }

    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join(SETTINGS_FILE))
    }

    /// Load settings from disk, using defaults when absent or unreadable
    pub fn load() -> Self {
        Self::settings_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save settings to disk, returning the path written
    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SettingsError::CreateDir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(SettingsError::Write)?;
        Ok(())
    }
}

fn resolve_config_dir(
    xdg_config: Option<std::ffi::OsString>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(xdg_config) = xdg_config {
        let path = PathBuf::from(xdg_config);
        if path.is_absolute() {
            return Some(path.join(APP_DIR));
        }
    }

    home.map(|h| h.join(".config").join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hpdtool-test-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.verify_round_trip);
        assert!(settings.catalog.is_none());
        assert!(settings.log_filter.contains("hpd_format=info"));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"catalog": "/tmp/tg.csv"}"#).unwrap();
        assert_eq!(settings.catalog, Some(PathBuf::from("/tmp/tg.csv")));
        assert!(settings.verify_round_trip);
        assert_eq!(settings.log_filter, default_log_filter());
    }

    #[test]
    fn test_config_dir_prefers_absolute_xdg() {
        let dir = resolve_config_dir(Some("/xdg".into()), Some(PathBuf::from("/home/u")));
        assert_eq!(dir, Some(PathBuf::from("/xdg/hpdtool")));
    }

    #[test]
    fn test_config_dir_ignores_relative_xdg() {
        let dir = resolve_config_dir(Some("relative".into()), Some(PathBuf::from("/home/u")));
        assert_eq!(dir, Some(PathBuf::from("/home/u/.config/hpdtool")));
        assert_eq!(resolve_config_dir(None, None), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = scratch_dir("save");
        let path = dir.join("nested").join(SETTINGS_FILE);
        let settings = Settings {
            log_filter: "hpd_format=trace".to_string(),
            verify_round_trip: false,
            catalog: Some(PathBuf::from("talkgroups.csv")),
        };

        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unreadable_file_falls_back() {
        let dir = scratch_dir("corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(SETTINGS_FILE);
        std::fs::write(&path, "not json").unwrap();

        assert_eq!(Settings::load_from(&path), Settings::default());
        assert_eq!(Settings::load_from(&dir.join("absent.json")), Settings::default());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
