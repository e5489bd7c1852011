use std::{fs, path::PathBuf};

use common::prelude::Address;
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "kairos";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the daemon API server
    #[serde(default = "default_app_port")]
    pub app_port: u16,

    /// Account the daemon submits transactions as
    pub account: Address,

    /// Ledger node configuration
    pub ledger: LedgerConfig,

    /// Content store (pinning + gateway) configuration
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Base URL of the ledger node
    pub endpoint: String,
    /// Address of the capsule contract on the ledger
    pub contract: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the pinning API
    #[serde(default = "default_pin_api_url")]
    pub api_url: String,
    /// Pinning API credentials
    pub api_key: String,
    pub api_secret: String,
    /// Base URL of the read gateway
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
}

fn default_app_port() -> u16 {
    8080
}

fn default_pin_api_url() -> String {
    "https://api.pinata.cloud".to_string()
}

fn default_gateway_url() -> String {
    "https://gateway.pinata.cloud/ipfs".to_string()
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the kairos directory (~/.kairos)
    pub kairos_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the kairos directory path (custom or default ~/.kairos)
    pub fn kairos_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }
        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new kairos state directory
    pub fn init(custom_path: Option<PathBuf>, config: AppConfig) -> Result<Self, StateError> {
        let kairos_dir = Self::kairos_dir(custom_path)?;

        if kairos_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }
        fs::create_dir_all(&kairos_dir)?;

        let config_path = kairos_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            kairos_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the kairos directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let kairos_dir = Self::kairos_dir(custom_path)?;

        if !kairos_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_path = kairos_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            kairos_dir,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("kairos directory not initialized. Run 'kairos init' first")]
    NotInitialized,

    #[error("kairos directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> AppConfig {
        AppConfig {
            app_port: 8080,
            account: "0x00a329c0648769a73afac7f9381e08fb43dbea72"
                .parse()
                .unwrap(),
            ledger: LedgerConfig {
                endpoint: "http://localhost:8545".to_string(),
                contract: "0x1111111111111111111111111111111111111111"
                    .parse()
                    .unwrap(),
            },
            store: StoreConfig {
                api_url: default_pin_api_url(),
                api_key: "key".to_string(),
                api_secret: "secret".to_string(),
                gateway_url: default_gateway_url(),
            },
        }
    }

    #[test]
    fn test_init_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state");

        let state = AppState::init(Some(path.clone()), sample_config()).unwrap();
        assert!(state.config_path.exists());

        let loaded = AppState::load(Some(path)).unwrap();
        assert_eq!(loaded.config.app_port, 8080);
        assert_eq!(loaded.config.account, state.config.account);
    }

    #[test]
    fn test_double_init_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state");

        AppState::init(Some(path.clone()), sample_config()).unwrap();
        assert!(matches!(
            AppState::init(Some(path), sample_config()),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_uninitialized_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppState::load(Some(dir.path().join("nope"))),
            Err(StateError::NotInitialized)
        ));
    }
}
