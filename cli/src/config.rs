//! Node configuration (tapcoin.toml)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tapcoin_core::UserId;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen: default_listen(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Seconds between ledger snapshots
    #[serde(default = "default_autosave_secs")]
    pub autosave_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            data_dir: default_data_dir(),
            autosave_secs: default_autosave_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct AdminConfig {
    /// Chat admin password; unset disables the chat admin flow
    pub password: Option<String>,
    /// Owner identity for the chat adapter (negative grants)
    pub owner_id: Option<UserId>,
    /// HTTP bearer token with admin capability
    pub api_token: Option<String>,
    /// HTTP bearer token with owner capability
    pub owner_api_token: Option<String>,
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_autosave_secs() -> u64 {
    60
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }
}
