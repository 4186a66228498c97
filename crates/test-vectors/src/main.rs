//! Test Vector Generator
//!
//! Generates JSON test vectors for the claim-contract Solidity tests: a
//! deterministic distribution over synthetic holders, every valid claim
//! with its proof, and tampered claims that must revert on-chain.

use alloy_primitives::{Address, B256, U256};
use anyhow::{Context, Result};
use clap::Parser;
use distribution_gen::{build_distribution, HolderBalance};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "generate-test-vectors")]
#[command(about = "Generate test vectors for the airdrop claim-contract Solidity tests")]
struct Args {
    /// Output directory for test vectors
    #[arg(short, long, default_value = "../../contracts/test-vectors")]
    output: PathBuf,

    /// Number of synthetic holders to generate
    #[arg(long, default_value = "10")]
    num_holders: u64,

    /// Total amount to distribute, in base units
    #[arg(long, default_value = "1000000000000000000000000")]
    total_amount: U256,
}

/// Test vector file format
#[derive(Debug, Serialize)]
struct TestVectorFile {
    /// Published Merkle root
    merkle_root: String,
    /// Requested distribution total, in base units
    total_amount: String,
    /// Sum actually allocated after floor division
    achieved_total: String,
    /// Valid claims with proofs
    claims: Vec<TestClaim>,
    /// Tampered claims for negative testing
    invalid_claims: Vec<InvalidTestClaim>,
}

/// A valid test claim
#[derive(Debug, Serialize)]
struct TestClaim {
    index: u64,
    address: String,
    amount: String,
    proof: Vec<String>,
}

/// A tampered claim that must fail verification
#[derive(Debug, Serialize)]
struct InvalidTestClaim {
    description: String,
    index: u64,
    address: String,
    amount: String,
    proof: Vec<String>,
}

/// Synthetic holder set: addresses derived from the position, balances
/// growing linearly so amounts differ per claim.
fn synthetic_holders(count: u64) -> Vec<HolderBalance> {
    (0..count)
        .map(|i| {
            let mut bytes = [0u8; 20];
            bytes[12..].copy_from_slice(&(i + 1).to_be_bytes());
            HolderBalance::new(
                Address::from_slice(&bytes),
                U256::from((i + 1) * 1_000) * U256::from(10).pow(U256::from(18)),
            )
        })
        .collect()
}

fn hex_proof(proof: &[B256]) -> Vec<String> {
    proof.iter().map(|h| format!("0x{}", hex::encode(h))).collect()
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    tracing::info!(
        output = %args.output.display(),
        holders = args.num_holders,
        total = %args.total_amount,
        "Generating test vectors"
    );

    let holders = synthetic_holders(args.num_holders);
    let bundle = build_distribution(&holders, args.total_amount)?;

    let mut claims = Vec::new();
    let mut invalid_claims = Vec::new();

    for holder in &holders {
        let address = format!("{:#x}", holder.address);
        let claim = bundle
            .claim(&address)
            .context("every holder has a claim")?;

        claims.push(TestClaim {
            index: claim.index,
            address: address.clone(),
            amount: claim.amount.to_string(),
            proof: hex_proof(&claim.proof),
        });

        // tampered amount: proof no longer matches the leaf
        invalid_claims.push(InvalidTestClaim {
            description: "amount inflated by one base unit".to_string(),
            index: claim.index,
            address: address.clone(),
            amount: (claim.amount + U256::from(1)).to_string(),
            proof: hex_proof(&claim.proof),
        });

        // replayed proof: valid proof presented under the wrong index
        invalid_claims.push(InvalidTestClaim {
            description: "proof replayed against a different index".to_string(),
            index: claim.index + 1,
            address,
            amount: claim.amount.to_string(),
            proof: hex_proof(&claim.proof),
        });
    }

    let file = TestVectorFile {
        merkle_root: format!("0x{}", hex::encode(bundle.merkle_root)),
        total_amount: bundle.requested_total.to_string(),
        achieved_total: bundle.achieved_total.to_string(),
        claims,
        invalid_claims,
    };

    // Ensure output directory exists
    std::fs::create_dir_all(&args.output)?;

    let output_path = args.output.join("claim_vectors.json");
    let json = serde_json::to_string_pretty(&file)?;
    std::fs::write(&output_path, json)?;

    tracing::info!(path = %output_path.display(), "Wrote test vectors");

    Ok(())
}
