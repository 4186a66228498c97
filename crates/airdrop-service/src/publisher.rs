//! Root Publisher
//!
//! Submits the computed Merkle root to the claim contract. Read-only
//! without a signer; publishing requires an explicit private key and is
//! guarded by a gas-price ceiling.

use alloy::{
    network::EthereumWallet,
    primitives::{Address, B256, U256},
    providers::{Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    sol,
};
use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

sol! {
    #[sol(rpc)]
    contract MerkleDistributor {
        function setMerkleRoot(bytes32 newRoot) external;
        function merkleRoot() external view returns (bytes32);
    }
}

/// Publisher configuration
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// JSON-RPC endpoint
    pub rpc_url: String,
    /// Claim contract address
    pub contract_address: String,
    /// Private key for signing transactions (hex, 0x prefix optional)
    pub private_key: Option<String>,
    /// Max gas price in Gwei
    pub max_gas_price_gwei: u64,
    /// Wait for confirmations (0 = don't wait)
    pub confirmations: u64,
}

/// Merkle root publisher
pub struct Publisher {
    config: PublisherConfig,
    contract_address: Address,
    signer: Option<PrivateKeySigner>,
}

impl Publisher {
    /// Create a read-only publisher (no signer).
    ///
    /// # Errors
    /// Returns an error if the contract address does not parse.
    pub fn new(config: PublisherConfig) -> Result<Self> {
        let contract_address: Address = config
            .contract_address
            .parse()
            .context("Invalid claim contract address")?;

        Ok(Self {
            config,
            contract_address,
            signer: None,
        })
    }

    /// Create a publisher that can submit transactions.
    ///
    /// # Errors
    /// Returns an error if no private key is configured or it does not
    /// parse.
    pub fn with_signer(config: PublisherConfig) -> Result<Self> {
        let private_key = config
            .private_key
            .as_ref()
            .context("Private key required for publishing")?;

        let contract_address: Address = config
            .contract_address
            .parse()
            .context("Invalid claim contract address")?;

        let key_bytes = private_key.strip_prefix("0x").unwrap_or(private_key);
        let signer: PrivateKeySigner = key_bytes.parse().context("Invalid private key")?;

        info!(address = %signer.address(), "Publisher initialized with signer");

        Ok(Self {
            config,
            contract_address,
            signer: Some(signer),
        })
    }

    /// Get the signer address (if configured)
    pub fn signer_address(&self) -> Option<Address> {
        self.signer.as_ref().map(PrivateKeySigner::address)
    }

    /// Read the root currently set on the claim contract.
    ///
    /// # Errors
    /// Returns an error if the RPC call fails.
    #[instrument(skip(self))]
    pub async fn current_root(&self) -> Result<B256> {
        let url: reqwest::Url = self.config.rpc_url.parse()?;
        let provider = ProviderBuilder::new().connect_http(url);

        let contract = MerkleDistributor::new(self.contract_address, &provider);
        let root: B256 = contract.merkleRoot().call().await?;

        debug!(root = %root, "Read current on-chain root");
        Ok(root)
    }

    /// Publish `root` to the claim contract.
    ///
    /// # Errors
    /// Returns an error if:
    /// - the publisher has no signer
    /// - the gas price exceeds the configured maximum
    /// - the transaction fails or reverts
    #[instrument(skip(self), fields(root = %root))]
    pub async fn publish_root(&self, root: B256) -> Result<B256> {
        let signer = self
            .signer
            .as_ref()
            .context("Publisher not configured with signer")?;

        let wallet = EthereumWallet::from(signer.clone());
        let url: reqwest::Url = self.config.rpc_url.parse()?;
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

        let gas_price = provider.get_gas_price().await?;
        let max_gas_price_wei =
            U256::from(self.config.max_gas_price_gwei) * U256::from(1_000_000_000);
        if U256::from(gas_price) > max_gas_price_wei {
            anyhow::bail!(
                "Gas price {} gwei exceeds maximum {} gwei",
                gas_price / 1_000_000_000,
                self.config.max_gas_price_gwei
            );
        }

        let contract = MerkleDistributor::new(self.contract_address, &provider);

        info!(root = %root, contract = %self.contract_address, "Publishing Merkle root");

        let pending_tx = contract
            .setMerkleRoot(root)
            .send()
            .await
            .context("Failed to send transaction")?;
        let tx_hash = *pending_tx.tx_hash();

        info!(tx_hash = %tx_hash, "Transaction submitted");

        if self.config.confirmations > 0 {
            debug!(
                confirmations = self.config.confirmations,
                "Waiting for confirmations"
            );
            let receipt = pending_tx
                .with_required_confirmations(self.config.confirmations)
                .get_receipt()
                .await
                .context("Failed to get transaction receipt")?;

            if !receipt.status() {
                anyhow::bail!("Transaction reverted: {}", tx_hash);
            }

            info!(
                tx_hash = %tx_hash,
                gas_used = receipt.gas_used,
                "Root published"
            );
        }

        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(private_key: Option<&str>) -> PublisherConfig {
        PublisherConfig {
            rpc_url: "http://localhost:8545".to_string(),
            contract_address: "0x0000000000000000000000000000000000000001".to_string(),
            private_key: private_key.map(ToString::to_string),
            max_gas_price_gwei: 100,
            confirmations: 1,
        }
    }

    #[test]
    fn test_publisher_creation_readonly() {
        let publisher = Publisher::new(config(None)).unwrap();
        assert!(publisher.signer_address().is_none());
    }

    #[test]
    fn test_publisher_creation_with_signer() {
        // Anvil's first default private key
        let publisher = Publisher::with_signer(config(Some(
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )))
        .unwrap();

        assert_eq!(
            publisher.signer_address().unwrap(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[test]
    fn test_publisher_accepts_0x_prefix() {
        let publisher = Publisher::with_signer(config(Some(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )));
        assert!(publisher.is_ok());
    }

    #[test]
    fn test_publisher_missing_private_key() {
        assert!(Publisher::with_signer(config(None)).is_err());
    }

    #[test]
    fn test_publisher_invalid_contract_address() {
        let mut bad = config(None);
        bad.contract_address = "not_an_address".to_string();
        assert!(Publisher::new(bad).is_err());
    }

    #[test]
    fn test_publisher_invalid_private_key() {
        assert!(Publisher::with_signer(config(Some("not_a_key"))).is_err());
    }
}
