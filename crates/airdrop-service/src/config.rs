//! Per-Network Configuration
//!
//! Every network the airdrop covers is one entry in a JSON configuration
//! file: where the token lives, which block range to scan, how much to
//! distribute. Explorer API keys can be supplied inline or through the
//! environment variable named by `explorer_api_key_env`.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("no explorer API key for network {network}: set {env_var}")]
    MissingApiKey { network: String, env_var: String },
}

fn default_block_increment() -> u64 {
    50_000
}

/// Snapshot and distribution parameters for one network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Short network name used in CLI arguments and output files
    pub name: String,
    /// EVM chain id
    pub chain_id: u64,
    /// DefiLlama chain slug for timestamp-to-block resolution
    pub llama_slug: String,
    /// JSON-RPC endpoint
    pub rpc_url: String,
    /// Explorer API base URL (e.g. `https://api.basescan.org`)
    pub explorer_url: String,
    /// Explorer API key, if not provided via environment
    #[serde(default)]
    pub explorer_api_key: Option<String>,
    /// Environment variable holding the explorer API key
    #[serde(default)]
    pub explorer_api_key_env: Option<String>,
    /// Token contract being snapshotted
    pub token: Address,
    /// Block the token contract was deployed at (scan start)
    pub deploy_block: u64,
    /// Snapshot block (scan end, balance read point)
    pub snapshot_block: u64,
    /// Total amount to distribute on this network, in base units
    pub total_amount: U256,
    /// Block window size per explorer page
    #[serde(default = "default_block_increment")]
    pub block_increment: u64,
    /// Claim contract to publish the root to, once deployed
    #[serde(default)]
    pub claim_contract: Option<Address>,
}

impl NetworkConfig {
    /// Resolve the explorer API key, preferring the environment.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingApiKey`] if neither the environment
    /// variable nor the inline key is set.
    pub fn explorer_api_key(&self) -> Result<String, ConfigError> {
        if let Some(env_var) = &self.explorer_api_key_env {
            if let Ok(key) = std::env::var(env_var) {
                return Ok(key);
            }
        }
        if let Some(key) = &self.explorer_api_key {
            return Ok(key.clone());
        }
        Err(ConfigError::MissingApiKey {
            network: self.name.clone(),
            env_var: self
                .explorer_api_key_env
                .clone()
                .unwrap_or_else(|| "EXPLORER_API_KEY".to_string()),
        })
    }
}

/// The full airdrop configuration: one entry per network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirdropConfig {
    /// Networks the airdrop covers
    pub networks: Vec<NetworkConfig>,
}

impl AirdropConfig {
    /// Load the configuration from a JSON file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Look up a network by name.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownNetwork`] if no entry matches.
    pub fn network(&self, name: &str) -> Result<&NetworkConfig, ConfigError> {
        self.networks
            .iter()
            .find(|n| n.name == name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))
    }
}
