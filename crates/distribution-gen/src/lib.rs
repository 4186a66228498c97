//! # Distribution Generation Library
//!
//! Core pipeline for proportional token airdrops. Turns a holder-balance
//! snapshot into:
//! - a deterministic proportional allocation with an auditable rounding
//!   shortfall,
//! - canonical `keccak256(index ++ address ++ amount)` leaf commitments,
//! - a sorted-pair Merkle tree and its root,
//! - a per-address inclusion proof bundle for the claim contract.
//!
//! Also hosts the HTTP collaborators that feed the pipeline: the block
//! explorer log client and the block-height resolver.

pub mod allocation;
pub mod blocks;
pub mod bundle;
pub mod explorer;
pub mod tree;
pub mod types;

pub use allocation::{allocate, AllocationError};
pub use blocks::{BlockResolver, BlockResolverError};
pub use bundle::{build_distribution, ClaimRecord, DistributionBundle, DistributionError};
pub use explorer::{ExplorerClient, ExplorerError, TransferLog, TRANSFER_TOPIC};
pub use tree::{hash_pair, leaf_hash, verify_proof, DistributionTree, TreeError};
pub use types::*;
