//! Block Explorer Log Client
//!
//! Fetches ERC-20 `Transfer` logs from an Etherscan-family explorer API.
//! One call covers one block window; the snapshot collector walks windows
//! and paces requests. The explorer reports "No records found" for an
//! empty window with a non-success status, which is a valid empty page,
//! not an error.

use alloy_primitives::{Address, B256};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

/// `keccak256("Transfer(address,address,uint256)")`
pub const TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// Errors from explorer API operations
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("explorer error: {0}")]
    ApiError(String),

    #[error("malformed transfer log: {0}")]
    MalformedLog(String),
}

/// A raw log entry from the explorer's `getLogs` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferLog {
    /// Emitting contract address
    pub address: String,
    /// Event topics; `topics[2]` is the transfer recipient
    pub topics: Vec<String>,
}

impl TransferLog {
    /// Decode the transfer recipient from `topics[2]`.
    ///
    /// Topics are 32-byte words; the address is the low 20 bytes.
    ///
    /// # Errors
    /// Returns [`ExplorerError::MalformedLog`] if the topic is missing or
    /// not valid hex.
    pub fn recipient(&self) -> Result<Address, ExplorerError> {
        let topic = self
            .topics
            .get(2)
            .ok_or_else(|| ExplorerError::MalformedLog("missing recipient topic".to_string()))?;
        let word: B256 = topic
            .parse()
            .map_err(|_| ExplorerError::MalformedLog(format!("invalid topic {topic}")))?;
        Ok(Address::from_word(word))
    }
}

#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    status: String,
    message: String,
    result: serde_json::Value,
}

/// Client for an Etherscan-family block explorer API
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ExplorerClient {
    /// Create a new explorer client.
    ///
    /// # Arguments
    /// * `base_url` - Explorer API base (e.g. `https://api.basescan.org`)
    /// * `api_key` - Explorer API key
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Fetch `Transfer` logs for `token` within `[from_block, to_block]`.
    ///
    /// # Errors
    /// Returns error if the request fails or the explorer reports an error
    /// other than an empty result set.
    #[instrument(skip(self, token))]
    pub async fn get_transfer_logs(
        &self,
        token: Address,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<TransferLog>, ExplorerError> {
        let url = format!("{}/api", self.base_url);
        let from = from_block.to_string();
        let to = to_block.to_string();
        let address = format!("{token:#x}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("module", "logs"),
                ("action", "getLogs"),
                ("fromBlock", from.as_str()),
                ("toBlock", to.as_str()),
                ("address", address.as_str()),
                ("topic0", TRANSFER_TOPIC),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let body: ExplorerResponse = response.json().await?;

        if body.status == "1" {
            let logs: Vec<TransferLog> = serde_json::from_value(body.result)
                .map_err(|e| ExplorerError::MalformedLog(e.to_string()))?;
            return Ok(logs);
        }

        // Etherscan signals an empty window as status "0"
        if body.message.contains("No records found") {
            return Ok(Vec::new());
        }

        Err(ExplorerError::ApiError(match body.result {
            serde_json::Value::String(detail) => detail,
            _ => body.message,
        }))
    }
}
