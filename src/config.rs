//! Configuration management for MintLedger

use crate::error::LedgerError;
use crate::identity::{address_from_hex, Address};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub gates: GateConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

#[derive(Debug, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_base_uri")]
    pub base_uri: String,
    pub administrator: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GateConfig {
    #[serde(default)]
    pub transfers_enabled: bool,
    #[serde(default)]
    pub market_enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotConfig {
    #[serde(default = "default_snapshot_path")]
    pub path: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        SnapshotConfig {
            path: default_snapshot_path(),
        }
    }
}

impl Config {
    /// Parse and validate the administrator principal.
    pub fn administrator_address(&self) -> Result<Address, LedgerError> {
        address_from_hex(&self.ledger.administrator)
            .map_err(|e| LedgerError::ConfigError(format!("ledger.administrator: {}", e)))
    }
}

fn default_name() -> String {
    "Mint Ledger".to_string()
}

fn default_base_uri() -> String {
    "https://tokens.example/meta/".to_string()
}

fn default_snapshot_path() -> String {
    "./data/ledger.snapshot".to_string()
}

fn default_administrator() -> String {
    hex::encode([0u8; 32])
}

pub fn load_config() -> Result<Config, LedgerError> {
    load_config_from("ledger.toml")
}

pub fn load_config_from(path: &str) -> Result<Config, LedgerError> {
    let config_str = fs::read_to_string(path).unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        // Provide sane defaults when the config file is absent
        Config {
            ledger: LedgerConfig {
                name: default_name(),
                base_uri: default_base_uri(),
                administrator: default_administrator(),
            },
            gates: GateConfig::default(),
            snapshot: SnapshotConfig::default(),
        }
    } else {
        toml::from_str(&config_str)
            .map_err(|e| LedgerError::ConfigError(format!("Failed to parse {}: {}", path, e)))?
    };

    // Validate critical values
    if config.ledger.name.is_empty() {
        return Err(LedgerError::ConfigError(
            "ledger.name must be set".to_string(),
        ));
    }
    config.administrator_address()?;

    Ok(config)
}
