//! Runtime configuration
//!
//! Layered: built-in defaults, then `<data dir>/config.yaml`, then environment.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{CONFIG_FILE, DATA_DIR_NAME, DEFAULT_API_URL, DEFAULT_LOG_FILE, DEFAULT_POLL_SECS};

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Prefix for every API call, without a trailing slash
    pub api_url: String,
    pub data_dir: PathBuf,
    pub signer_poll_interval: Duration,
    /// Requests never time out unless this is set
    pub request_timeout: Option<Duration>,
    pub log_file: PathBuf,
}

/// Shape of `config.yaml`; every key is optional
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_url: Option<String>,
    signer_poll_interval_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: default_data_dir(),
            signer_poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            request_timeout: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    /// Load configuration from the process environment and config file
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration using `env` to look up environment variables
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        // The data dir decides where the config file lives, so resolve it first
        if let Some(dir) = env("VIBRA_DATA_DIR").filter(|d| !d.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        let config_file = config.data_dir.join(CONFIG_FILE);
        config.apply_file(&config_file)?;

        if let Some(url) = env("VIBRA_API_URL").filter(|u| !u.is_empty()) {
            config.api_url = url;
        }
        if let Some(secs) = env("VIBRA_POLL_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("VIBRA_POLL_SECS must be a whole number of seconds, got {:?}", secs))?;
            config.signer_poll_interval = Duration::from_secs(secs.max(1));
        }

        config.api_url = config.api_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let file: FileConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        if let Some(url) = file.api_url {
            self.api_url = url;
        }
        if let Some(secs) = file.signer_poll_interval_secs {
            self.signer_poll_interval = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(log_file) = file.log_file {
            self.log_file = log_file;
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().to_string_lossy().to_string();
        let config = Config::load_with(env_of(&[("VIBRA_DATA_DIR", data_dir)])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.signer_poll_interval, Duration::from_secs(DEFAULT_POLL_SECS));
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.data_dir, dir.path());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "api_url: https://file.example\nrequest_timeout_secs: 20\nsigner_poll_interval_secs: 9\n",
        )
        .unwrap();
        let config = Config::load_with(env_of(&[
            ("VIBRA_DATA_DIR", dir.path().to_string_lossy().to_string()),
            ("VIBRA_API_URL", "https://env.example/".to_string()),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://env.example");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(20)));
        assert_eq!(config.signer_poll_interval, Duration::from_secs(9));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "api_url: [unclosed").unwrap();
        let result = Config::load_with(env_of(&[(
            "VIBRA_DATA_DIR",
            dir.path().to_string_lossy().to_string(),
        )]));
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_poll_secs_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = Config::load_with(env_of(&[
            ("VIBRA_DATA_DIR", dir.path().to_string_lossy().to_string()),
            ("VIBRA_POLL_SECS", "soon".to_string()),
        ]));
        assert!(result.is_err());
    }
}
