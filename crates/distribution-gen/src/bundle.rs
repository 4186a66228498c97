//! Distribution Bundle Assembly
//!
//! Composes the allocator and the Merkle tree into the published artifact:
//! the root, the requested and achieved totals, and one claim record per
//! address (index, amount, sibling proof), keyed by lowercase address.
//! The bundle is what gets persisted for the claim contract and the web
//! claim UI; it is never mutated after construction.

use crate::allocation::{allocate, AllocationError};
use crate::tree::{DistributionTree, TreeError};
use crate::types::HolderBalance;
use alloy_primitives::{utils::format_ether, B256, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from bundle assembly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DistributionError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// One address's claim: everything needed to call the claim contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Leaf index bound into the proof
    pub index: u64,
    /// Allocated amount in base units
    pub amount: U256,
    /// Allocated amount as a human-readable 18-decimal string
    pub amount_formatted: String,
    /// Sibling hashes, leaf-to-root order
    pub proof: Vec<B256>,
}

/// The published distribution: root, totals, and per-address claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionBundle {
    /// The committed Merkle root
    pub merkle_root: B256,
    /// The total the caller asked to distribute
    pub requested_total: U256,
    /// The sum actually allocated after floor division
    pub achieved_total: U256,
    /// Claims keyed by lowercase `0x…` address
    pub claims: BTreeMap<String, ClaimRecord>,
}

impl DistributionBundle {
    /// Look up a claim by address, case-insensitively.
    #[must_use]
    pub fn claim(&self, address: &str) -> Option<&ClaimRecord> {
        self.claims.get(&address.to_ascii_lowercase())
    }

    /// Number of claimable addresses.
    #[must_use]
    pub fn claim_count(&self) -> usize {
        self.claims.len()
    }

    /// Rounding loss against the requested total.
    #[must_use]
    pub fn shortfall(&self) -> U256 {
        self.requested_total - self.achieved_total
    }
}

/// Run the full pipeline: allocate, build the tree, extract every proof.
///
/// Holder order fixes the leaf indices; supply a stable ordering for
/// reproducible output.
///
/// # Errors
/// Propagates [`AllocationError`] for invalid holder input and
/// [`TreeError`] from tree construction.
pub fn build_distribution(
    holders: &[HolderBalance],
    total_amount: U256,
) -> Result<DistributionBundle, DistributionError> {
    let allocation = allocate(holders, total_amount)?;
    let tree = DistributionTree::from_allocation(&allocation)?;

    let mut claims = BTreeMap::new();
    for entry in &allocation.entries {
        let proof = tree.proof(entry.index as usize)?;
        claims.insert(
            format!("{:#x}", entry.address),
            ClaimRecord {
                index: entry.index,
                amount: entry.amount,
                amount_formatted: format_ether(entry.amount),
                proof,
            },
        );
    }

    Ok(DistributionBundle {
        merkle_root: tree.root(),
        requested_total: allocation.requested_total,
        achieved_total: allocation.achieved_total,
        claims,
    })
}
