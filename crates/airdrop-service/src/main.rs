//! Airdrop Service
//!
//! Snapshot collection, distribution building, root publishing and the
//! claim API, driven by a per-network JSON configuration.

mod api;
mod balances;
mod config;
mod publisher;
mod snapshot;
mod state;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use distribution_gen::{build_distribution, DistributionBundle, HolderBalance};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "airdrop-service")]
#[command(about = "Snapshot, build and serve proportional airdrop distributions")]
struct Args {
    /// Path to the per-network configuration file
    #[arg(long, env = "AIRDROP_CONFIG", default_value = "networks.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect the holder snapshot for one network
    Snapshot {
        /// Network name from the configuration file
        network: String,

        /// Directory for snapshot output files
        #[arg(long, default_value = "snapshots")]
        out_dir: PathBuf,
    },

    /// Build the Merkle distribution from a collected snapshot
    Build {
        /// Network name from the configuration file
        network: String,

        /// Snapshot file produced by the `snapshot` command
        #[arg(long)]
        snapshot: PathBuf,

        /// Directory for distribution output files
        #[arg(long, default_value = "distributions")]
        out_dir: PathBuf,

        /// Skip holders that are contracts at the snapshot block
        #[arg(long)]
        exclude_contracts: bool,
    },

    /// Publish a built distribution's root to the claim contract
    Publish {
        /// Network name from the configuration file
        network: String,

        /// Distribution file produced by the `build` command
        #[arg(long)]
        distribution: PathBuf,

        /// Private key for transaction signing (hex, 0x prefix optional)
        #[arg(long, env = "PRIVATE_KEY")]
        private_key: Option<String>,

        /// Max gas price in Gwei
        #[arg(long, default_value = "100")]
        max_gas_price_gwei: u64,

        /// Confirmations to wait for (0 = don't wait)
        #[arg(long, default_value = "1")]
        confirmations: u64,
    },

    /// Resolve a snapshot timestamp to a block height for one network
    ResolveBlock {
        /// Network name from the configuration file
        network: String,

        /// Unix timestamp in seconds
        timestamp: u64,
    },

    /// Serve built distributions over the claim API
    Serve {
        /// Directory holding `distribution-<network>.json` files
        #[arg(long, default_value = "distributions")]
        distributions_dir: PathBuf,

        /// API listen address
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env if present
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    match args.command {
        Command::Snapshot { network, out_dir } => {
            let config = load_config(&args.config)?;
            run_snapshot(&config, &network, &out_dir).await
        }
        Command::Build {
            network,
            snapshot,
            out_dir,
            exclude_contracts,
        } => {
            let config = load_config(&args.config)?;
            run_build(&config, &network, &snapshot, &out_dir, exclude_contracts)
        }
        Command::Publish {
            network,
            distribution,
            private_key,
            max_gas_price_gwei,
            confirmations,
        } => {
            let config = load_config(&args.config)?;
            run_publish(
                &config,
                &network,
                &distribution,
                private_key,
                max_gas_price_gwei,
                confirmations,
            )
            .await
        }
        Command::ResolveBlock { network, timestamp } => {
            let config = load_config(&args.config)?;
            run_resolve_block(&config, &network, timestamp).await
        }
        Command::Serve {
            distributions_dir,
            listen,
        } => run_serve(&distributions_dir, listen).await,
    }
}

fn load_config(path: &Path) -> Result<config::AirdropConfig> {
    config::AirdropConfig::load(path)
        .with_context(|| format!("Failed to load config {}", path.display()))
}

async fn run_snapshot(
    config: &config::AirdropConfig,
    network: &str,
    out_dir: &Path,
) -> Result<()> {
    let network_config = config.network(network)?.clone();
    tracing::info!(
        network,
        token = %network_config.token,
        snapshot_block = network_config.snapshot_block,
        "Collecting snapshot"
    );

    let collector = snapshot::SnapshotCollector::new(network_config)?;
    let records = collector.collect().await?;

    std::fs::create_dir_all(out_dir)?;
    let out_path = out_dir.join(format!("snapshot-{network}.json"));
    std::fs::write(&out_path, serde_json::to_string_pretty(&records)?)?;

    tracing::info!(path = %out_path.display(), holders = records.len(), "Snapshot written");
    Ok(())
}

fn run_build(
    config: &config::AirdropConfig,
    network: &str,
    snapshot: &Path,
    out_dir: &Path,
    exclude_contracts: bool,
) -> Result<()> {
    let network_config = config.network(network)?;

    let raw = std::fs::read_to_string(snapshot)
        .with_context(|| format!("Failed to read snapshot {}", snapshot.display()))?;
    let records: Vec<balances::SnapshotRecord> = serde_json::from_str(&raw)?;

    let mut holders: Vec<HolderBalance> = records
        .iter()
        .filter(|r| !(exclude_contracts && r.is_contract))
        .map(|r| r.to_holder_balance())
        .collect();

    // the snapshot file is ordered by balance for auditing; leaf indices
    // come from address order
    holders.sort_by_key(|h| h.address);

    let bundle = build_distribution(&holders, network_config.total_amount)?;

    tracing::info!(
        network,
        root = %bundle.merkle_root,
        claims = bundle.claim_count(),
        achieved = %bundle.achieved_total,
        shortfall = %bundle.shortfall(),
        "Distribution built"
    );

    std::fs::create_dir_all(out_dir)?;
    let out_path = out_dir.join(format!("distribution-{network}.json"));
    std::fs::write(&out_path, serde_json::to_string_pretty(&bundle)?)?;

    tracing::info!(path = %out_path.display(), "Distribution written");
    Ok(())
}

async fn run_publish(
    config: &config::AirdropConfig,
    network: &str,
    distribution: &Path,
    private_key: Option<String>,
    max_gas_price_gwei: u64,
    confirmations: u64,
) -> Result<()> {
    let network_config = config.network(network)?;
    let claim_contract = network_config
        .claim_contract
        .context("No claim contract configured for this network")?;

    let raw = std::fs::read_to_string(distribution)
        .with_context(|| format!("Failed to read distribution {}", distribution.display()))?;
    let bundle: DistributionBundle = serde_json::from_str(&raw)?;

    let publisher = publisher::Publisher::with_signer(publisher::PublisherConfig {
        rpc_url: network_config.rpc_url.clone(),
        contract_address: format!("{claim_contract:#x}"),
        private_key,
        max_gas_price_gwei,
        confirmations,
    })?;

    let tx_hash = publisher.publish_root(bundle.merkle_root).await?;
    tracing::info!(network, tx_hash = %tx_hash, root = %bundle.merkle_root, "Root published");
    Ok(())
}

async fn run_resolve_block(
    config: &config::AirdropConfig,
    network: &str,
    timestamp: u64,
) -> Result<()> {
    let network_config = config.network(network)?;
    let resolver = distribution_gen::BlockResolver::default();
    let height = resolver
        .block_at_timestamp(&network_config.llama_slug, timestamp)
        .await?;

    tracing::info!(network, timestamp, height, "Resolved snapshot block");
    println!("{height}");
    Ok(())
}

async fn run_serve(distributions_dir: &Path, listen: String) -> Result<()> {
    let app_state = state::AppState::new();

    for entry in std::fs::read_dir(distributions_dir)
        .with_context(|| format!("Failed to read {}", distributions_dir.display()))?
    {
        let path = entry?.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(network) = file_name
            .strip_prefix("distribution-")
            .and_then(|n| n.strip_suffix(".json"))
        else {
            continue;
        };

        let raw = std::fs::read_to_string(&path)?;
        let bundle: DistributionBundle = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::info!(
            network,
            root = %bundle.merkle_root,
            claims = bundle.claim_count(),
            "Distribution loaded"
        );
        app_state.insert_distribution(network, bundle);
    }

    let api_handle = tokio::spawn(api::run_server(listen, app_state));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal");
        }
        result = api_handle => {
            if let Err(e) = result {
                tracing::error!(error = %e, "API server error");
            }
        }
    }

    Ok(())
}
