//! Snapshot and Allocation Records
//!
//! Strongly-typed records flowing through the distribution pipeline:
//! holder balances in, allocation entries out. Balances and amounts are
//! base-unit (18-decimal) integers throughout; nothing in the pipeline
//! touches floating point.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A holder's token balance at the snapshot block.
///
/// Produced by the snapshot collaborators and immutable once captured.
/// The allocator requires one entry per address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderBalance {
    /// Holder address
    pub address: Address,
    /// Balance in base units at the snapshot block
    pub balance: U256,
}

impl HolderBalance {
    /// Create a new holder balance record.
    #[must_use]
    pub fn new(address: Address, balance: U256) -> Self {
        Self { address, balance }
    }
}

/// One holder's share of the airdrop.
///
/// `index` is the zero-based position of the holder in the input ordering.
/// It is embedded in the leaf hash, so the same ordering must be used when
/// building the tree and when verifying claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationEntry {
    /// Position in the holder ordering, embedded in the leaf hash
    pub index: u64,
    /// Holder address
    pub address: Address,
    /// Allocated amount in base units
    pub amount: U256,
}

/// The full output of the allocator.
///
/// `achieved_total` is the exact sum of all allocated amounts. Floor
/// division loses at most one base unit per holder, so the shortfall
/// against `requested_total` is bounded by the holder count. The remainder
/// is reported, never redistributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Per-holder entries, in input order
    pub entries: Vec<AllocationEntry>,
    /// The total the caller asked to distribute
    pub requested_total: U256,
    /// The sum actually allocated after floor division
    pub achieved_total: U256,
}

impl Allocation {
    /// Rounding loss: `requested_total - achieved_total`.
    ///
    /// Strictly less than the number of holders (one base unit each at
    /// most).
    #[must_use]
    pub fn shortfall(&self) -> U256 {
        self.requested_total - self.achieved_total
    }

    /// Number of holders in the allocation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the allocation holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
