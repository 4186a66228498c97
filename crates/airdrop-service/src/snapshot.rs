//! Snapshot Collector
//!
//! Walks the explorer's `Transfer` logs from the token's deploy block to
//! the snapshot block in fixed windows, accumulates every address that
//! ever received the token, then reads balances at the snapshot block.
//! Addresses come out sorted ascending, which fixes the leaf indices the
//! allocator assigns downstream.

use crate::balances::{BalanceReader, SnapshotRecord};
use crate::config::NetworkConfig;
use alloy::primitives::Address;
use anyhow::{Context, Result};
use distribution_gen::ExplorerClient;
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument};

/// Pause between explorer pages (explorer rate limit)
const PAGE_DELAY: Duration = Duration::from_millis(500);

/// Collects the holder set for one network's snapshot.
pub struct SnapshotCollector {
    config: NetworkConfig,
    explorer: ExplorerClient,
}

impl SnapshotCollector {
    /// Create a collector for one configured network.
    ///
    /// # Errors
    /// Returns an error if no explorer API key is configured.
    pub fn new(config: NetworkConfig) -> Result<Self> {
        let api_key = config
            .explorer_api_key()
            .context("Explorer API key required for snapshot collection")?;
        let explorer = ExplorerClient::new(config.explorer_url.clone(), api_key);
        Ok(Self { config, explorer })
    }

    /// Collect every address that ever received the token before the
    /// snapshot block, sorted ascending.
    ///
    /// # Errors
    /// Returns an error if an explorer page fails or a log is malformed.
    #[instrument(skip(self), fields(network = %self.config.name))]
    pub async fn collect_recipients(&self) -> Result<Vec<Address>> {
        let mut recipients = BTreeSet::new();
        let mut from_block = self.config.deploy_block;

        while from_block < self.config.snapshot_block {
            let to_block =
                (from_block + self.config.block_increment).min(self.config.snapshot_block);
            info!(from_block, to_block, "Fetching transfer logs");

            sleep(PAGE_DELAY).await;
            let logs = self
                .explorer
                .get_transfer_logs(self.config.token, from_block, to_block)
                .await
                .context("Explorer page failed")?;

            for log in &logs {
                recipients.insert(log.recipient().context("Malformed transfer log")?);
            }

            from_block = to_block + 1;
        }

        info!(recipients = recipients.len(), "Recipient scan complete");
        Ok(recipients.into_iter().collect())
    }

    /// Run the full snapshot: recipient scan, balance read, sort by
    /// descending balance for the audit file.
    ///
    /// # Errors
    /// Returns an error if the explorer walk or a balance read fails.
    #[instrument(skip(self), fields(network = %self.config.name))]
    pub async fn collect(&self) -> Result<Vec<SnapshotRecord>> {
        let recipients = self.collect_recipients().await?;

        let reader = BalanceReader::new(
            self.config.rpc_url.clone(),
            self.config.token,
            self.config.snapshot_block,
        );
        let mut records = reader.read_holders(&recipients).await?;

        records.sort_by(|a, b| b.balance.cmp(&a.balance));

        info!(
            holders = records.len(),
            network = %self.config.name,
            "Snapshot collected"
        );
        Ok(records)
    }
}
