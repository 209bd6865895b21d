use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    errors::ConfigError,
    storage::DEFAULT_SNAPSHOT_KEY,
};

/// User preferences stored next to the ledger snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_snapshot_key")]
    pub snapshot_key: String,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    /// Command that reads free text on stdin and prints an analysis result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract_command: Option<String>,
    /// Command that reads a ledger summary on stdin and prints a tip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advice_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_key: Self::default_snapshot_key(),
            currency_symbol: Self::default_currency_symbol(),
            extract_command: None,
            advice_command: None,
        }
    }
}

impl Config {
    pub fn default_snapshot_key() -> String {
        DEFAULT_SNAPSHOT_KEY.into()
    }

    pub fn default_currency_symbol() -> String {
        "R$".into()
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: &Path) -> Result<Self, ConfigError> {
        ensure_dir(base)?;
        Ok(Self {
            path: PathResolver::config_file_in(base),
        })
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        let config = Config {
            currency_symbol: "€".into(),
            advice_command: Some("tipgen --short".into()),
            ..Config::default()
        };
        manager.save(&config).expect("save config");
        assert_eq!(manager.load().expect("load config"), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        fs::write(manager.path(), r#"{"currency_symbol": "$"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.snapshot_key, DEFAULT_SNAPSHOT_KEY);
        assert_eq!(config.extract_command, None);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        fs::write(manager.path(), "{ nope").unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
    }
}
