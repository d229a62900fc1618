use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_VERSION: u64 = 1;

const APP_DIR: &str = "solomon";

/// File holding the state document; named after the original storage key.
pub const STATE_FILE: &str = "solomons-order-v3.json";

pub const ENV_REMOTE_URL: &str = "SOLOMON_REMOTE_URL";
pub const ENV_DATA_DIR: &str = "SOLOMON_DATA_DIR";

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join(APP_DIR)
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct SolomonConfig {
    pub data_directory: PathBuf,
    /// Base URL of the state mirror, e.g. `http://localhost:3000`. Unset means local only.
    pub remote_url: Option<String>,
    pub request_timeout_secs: u64,
    pub debug_logging: bool,
}

impl Default for SolomonConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_dir(),
            remote_url: None,
            request_timeout_secs: 10,
            debug_logging: false,
        }
    }
}

impl SolomonConfig {
    /// `~/.config/solomon/v1/config.json` on Linux.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join(APP_DIR)
            .join(format!("v{}", CONFIG_VERSION))
            .join("config.json")
    }

    /// Config file plus environment overrides.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path()).with_env(|key| std::env::var(key).ok())
    }

    /// Missing or unreadable files give the defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_REMOTE_URL) {
            let url = url.trim();
            self.remote_url = if url.is_empty() { None } else { Some(url.to_string()) };
        }
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|d| !d.trim().is_empty()) {
            self.data_directory = PathBuf::from(dir);
        }
        self
    }

    pub fn remote_url(&self) -> Option<&str> {
        self.remote_url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn state_path(&self) -> PathBuf {
        self.data_directory.join(STATE_FILE)
    }

    /// Default location for an export taken on `date`.
    pub fn export_path(&self, date: NaiveDate) -> PathBuf {
        self.data_directory
            .join(format!("solomons-order-{}.json", date.format("%Y-%m-%d")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SolomonConfig::load_from(&dir.path().join("nope.json"));
        assert_eq!(config, SolomonConfig::default());
        assert_eq!(config.remote_url(), None);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"remote_url": "http://localhost:3000"}"#).unwrap();
        let config = SolomonConfig::load_from(&path);
        assert_eq!(config.remote_url(), Some("http://localhost:3000"));
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "remote_url = 3").unwrap();
        assert_eq!(SolomonConfig::load_from(&path), SolomonConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = SolomonConfig {
            data_directory: dir.path().to_path_buf(),
            remote_url: Some("https://order.example".into()),
            request_timeout_secs: 3,
            debug_logging: true,
        };
        config.save_to(&path).unwrap();
        assert_eq!(SolomonConfig::load_from(&path), config);
    }

    #[test]
    fn env_overrides_file() {
        let config = SolomonConfig::default().with_env(|key| match key {
            ENV_REMOTE_URL => Some(" http://mirror:3000 ".into()),
            ENV_DATA_DIR => Some("/srv/solomon".into()),
            _ => None,
        });
        assert_eq!(config.remote_url(), Some("http://mirror:3000"));
        assert_eq!(config.state_path(), PathBuf::from("/srv/solomon").join(STATE_FILE));

        let cleared = config.with_env(|key| (key == ENV_REMOTE_URL).then(String::new));
        assert_eq!(cleared.remote_url(), None);
    }

    #[test]
    fn export_path_is_dated() {
        let config = SolomonConfig {
            data_directory: PathBuf::from("/data"),
            ..SolomonConfig::default()
        };
        let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        assert_eq!(
            config.export_path(date),
            PathBuf::from("/data/solomons-order-2026-10-15.json")
        );
    }
}
