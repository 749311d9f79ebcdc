//! Application configuration management.
//!
//! The configuration holds the dataset URL, HTTP timeouts and the simulated
//! response latency the repository applies to every operation.
//!
//! Configuration is stored at `~/.config/heroes/config.json`. Any field can
//! be overridden from the environment (`HEROES_*`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::DEFAULT_API_BASE_URL;
use crate::repository::RepositoryConfig;

/// Application name used for config directory paths
const APP_NAME: &str = "heroes";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const ENV_API_URL: &str = "HEROES_API_URL";
const ENV_READ_LATENCY_MS: &str = "HEROES_READ_LATENCY_MS";
const ENV_WRITE_LATENCY_MS: &str = "HEROES_WRITE_LATENCY_MS";
const ENV_LOAD_TIMEOUT_SECS: &str = "HEROES_LOAD_TIMEOUT_SECS";
const ENV_OFFLINE: &str = "HEROES_OFFLINE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Upper bound on the initial catalog load. `None` waits as long as the
    /// HTTP timeout allows.
    pub load_timeout_secs: Option<u64>,
    pub read_latency_ms: u64,
    pub write_latency_ms: u64,
    /// Skip the remote dataset entirely and start with an empty catalog
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            load_timeout_secs: None,
            read_latency_ms: 300,
            write_latency_ms: 500,
            offline: false,
        }
    }
}

impl Config {
    /// Load from the user's config directory, falling back to defaults when
    /// no file exists yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply `HEROES_*` environment variables on top of this config
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok());
        self
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.is_empty()) {
            self.api_base_url = url;
        }
        if let Some(ms) = parse_override(&lookup, ENV_READ_LATENCY_MS) {
            self.read_latency_ms = ms;
        }
        if let Some(ms) = parse_override(&lookup, ENV_WRITE_LATENCY_MS) {
            self.write_latency_ms = ms;
        }
        if let Some(secs) = parse_override(&lookup, ENV_LOAD_TIMEOUT_SECS) {
            self.load_timeout_secs = Some(secs);
        }
        if let Some(value) = lookup(ENV_OFFLINE) {
            let value = value.trim().to_ascii_lowercase();
            self.offline = matches!(value.as_str(), "1" | "true" | "yes");
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn repository_config(&self) -> RepositoryConfig {
        RepositoryConfig {
            read_latency: Duration::from_millis(self.read_latency_ms),
            write_latency: Duration::from_millis(self.write_latency_ms),
            load_timeout: self.load_timeout_secs.map(Duration::from_secs),
        }
    }
}

fn parse_override(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "Ignoring unparsable config override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        let repo = config.repository_config();
        assert_eq!(repo.read_latency, Duration::from_millis(300));
        assert_eq!(repo.write_latency, Duration::from_millis(500));
        assert!(repo.load_timeout.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"read_latency_ms": 0, "offline": true}"#).unwrap();
        assert_eq!(config.read_latency_ms, 0);
        assert!(config.offline);
        assert_eq!(config.write_latency_ms, 500);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(lookup_from(&[
            (ENV_API_URL, "http://localhost:9000/api"),
            (ENV_READ_LATENCY_MS, "0"),
            (ENV_WRITE_LATENCY_MS, "not-a-number"),
            (ENV_LOAD_TIMEOUT_SECS, "5"),
            (ENV_OFFLINE, "TRUE"),
        ]));

        assert_eq!(config.api_base_url, "http://localhost:9000/api");
        assert_eq!(config.read_latency_ms, 0);
        assert_eq!(config.write_latency_ms, 500);
        assert_eq!(config.load_timeout_secs, Some(5));
        assert!(config.offline);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("heroes-config-test-{}", std::process::id()));
        let path = dir.join(CONFIG_FILE);

        let config = Config {
            load_timeout_secs: Some(10),
            read_latency_ms: 25,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("heroes-config-does-not-exist.json");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }
}
