//! Snapshot Block Resolver
//!
//! Resolves a snapshot timestamp to a block height through the DefiLlama
//! coins API, so per-network configuration can pin snapshots by time
//! instead of hardcoding heights.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

const DEFAULT_BASE_URL: &str = "https://coins.llama.fi";

/// Errors from block resolution
#[derive(Debug, Error)]
pub enum BlockResolverError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Client for the DefiLlama block-by-timestamp endpoint
#[derive(Debug, Clone)]
pub struct BlockResolver {
    client: Client,
    base_url: String,
}

impl BlockResolver {
    /// Create a resolver against a specific API base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Resolve the block height at `timestamp` on `chain`.
    ///
    /// # Arguments
    /// * `chain` - DefiLlama chain slug (e.g. `ethereum`, `base`, `bsc`)
    /// * `timestamp` - Unix timestamp in seconds
    ///
    /// # Errors
    /// Returns error if the request fails or the API responds with a
    /// non-success status.
    #[instrument(skip(self))]
    pub async fn block_at_timestamp(
        &self,
        chain: &str,
        timestamp: u64,
    ) -> Result<u64, BlockResolverError> {
        let url = format!("{}/block/{chain}/{timestamp}", self.base_url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(BlockResolverError::InvalidResponse(format!(
                "unexpected status: {}",
                response.status()
            )));
        }

        #[derive(Deserialize)]
        struct BlockResponse {
            height: u64,
        }

        let body: BlockResponse = response.json().await?;
        Ok(body.height)
    }
}

impl Default for BlockResolver {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
