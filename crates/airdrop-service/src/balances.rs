//! Snapshot Balance Reader
//!
//! Reads every candidate holder's token balance at the snapshot block with
//! batched `balanceOf` multicalls, and flags contract addresses via code
//! lookup so contract holders can be audited before publishing.

use alloy::{
    primitives::{utils::format_ether, Address, U256},
    providers::{Provider, ProviderBuilder},
    sol,
};
use anyhow::{Context, Result};
use distribution_gen::HolderBalance;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

sol! {
    #[sol(rpc)]
    contract Erc20 {
        function balanceOf(address account) external view returns (uint256);
    }
}

/// Addresses per multicall batch
const BATCH_SIZE: usize = 500;

/// One audited snapshot row: balance plus contract flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Holder address
    pub address: Address,
    /// Balance in base units at the snapshot block
    pub balance: U256,
    /// Balance as a human-readable 18-decimal string
    pub balance_formatted: String,
    /// Whether the address had code at the snapshot block
    pub is_contract: bool,
}

impl SnapshotRecord {
    /// Strip the audit fields down to the core's input record.
    #[must_use]
    pub fn to_holder_balance(&self) -> HolderBalance {
        HolderBalance::new(self.address, self.balance)
    }
}

/// Batched balance reader pinned to one token and snapshot block.
#[derive(Debug, Clone)]
pub struct BalanceReader {
    rpc_url: String,
    token: Address,
    snapshot_block: u64,
}

impl BalanceReader {
    /// Create a reader for `token` at `snapshot_block`.
    #[must_use]
    pub fn new(rpc_url: impl Into<String>, token: Address, snapshot_block: u64) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            token,
            snapshot_block,
        }
    }

    /// Read balances for `candidates` at the snapshot block and keep the
    /// non-zero holders, preserving the candidate order.
    ///
    /// # Errors
    /// Returns an error if the RPC endpoint is unreachable or a multicall
    /// fails.
    #[instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    pub async fn read_holders(&self, candidates: &[Address]) -> Result<Vec<SnapshotRecord>> {
        let url: reqwest::Url = self.rpc_url.parse().context("Invalid RPC URL")?;
        let provider = ProviderBuilder::new().connect_http(url);
        let token = Erc20::new(self.token, provider.clone());

        let mut records = Vec::new();
        for batch in candidates.chunks(BATCH_SIZE) {
            let mut multicall = provider.multicall().dynamic::<Erc20::balanceOfCall>();
            for address in batch {
                multicall = multicall.add_dynamic(token.balanceOf(*address));
            }

            let balances = multicall
                .block(self.snapshot_block.into())
                .aggregate()
                .await
                .context("balanceOf multicall failed")?;

            debug!(batch = batch.len(), "Fetched balance batch");

            for (address, balance) in batch.iter().zip(balances) {
                if balance.is_zero() {
                    continue;
                }

                let code = provider
                    .get_code_at(*address)
                    .block_id(self.snapshot_block.into())
                    .await
                    .context("getCode failed")?;

                records.push(SnapshotRecord {
                    address: *address,
                    balance,
                    balance_formatted: format_ether(balance),
                    is_contract: !code.is_empty(),
                });
            }
        }

        info!(
            holders = records.len(),
            candidates = candidates.len(),
            "Snapshot balances read"
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_record_to_holder_balance() {
        let record = SnapshotRecord {
            address: Address::repeat_byte(0xaa),
            balance: U256::from(1_000_000),
            balance_formatted: "0.000000000001000000".to_string(),
            is_contract: false,
        };

        let holder = record.to_holder_balance();
        assert_eq!(holder.address, record.address);
        assert_eq!(holder.balance, record.balance);
    }

    #[test]
    fn test_reader_construction() {
        let reader = BalanceReader::new(
            "http://localhost:8545",
            Address::repeat_byte(0x75),
            15_378_131,
        );
        assert_eq!(reader.snapshot_block, 15_378_131);
    }
}
