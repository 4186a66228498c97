//! Sorted-Pair Merkle Tree
//!
//! Builds the distribution commitment over allocation leaves. Each leaf is
//! `keccak256(index ++ address ++ amount)` with the fields tightly packed
//! big-endian (`uint256 ++ 20 bytes ++ uint256`), matching the claim
//! contract's `abi.encodePacked` check. Binding the index into the leaf
//! stops structurally-identical allocations at different positions from
//! colliding and pins each proof to one position.
//!
//! Parents hash their two children in ascending byte order ("sort pairs"),
//! so proof verification folds siblings without tracking left/right. An
//! unpaired trailing node is promoted unchanged to the next level; roots
//! are not portable to duplicate-odd constructions.

use crate::types::Allocation;
use alloy_primitives::{keccak256, Address, B256, U256};
use thiserror::Error;

/// Errors from tree construction and proof extraction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("cannot build a tree from an empty leaf set")]
    EmptyLeaves,

    #[error("leaf index {index} out of range for tree with {leaf_count} leaves")]
    IndexOutOfRange { index: usize, leaf_count: usize },
}

/// Hash an allocation entry into its leaf commitment.
///
/// Layout: `index` as a big-endian unsigned 256-bit word, the 20-byte
/// address, then `amount` as a big-endian unsigned 256-bit word. 84 bytes,
/// no padding.
#[must_use]
pub fn leaf_hash(index: u64, address: Address, amount: U256) -> B256 {
    let mut buf = [0u8; 84];
    buf[..32].copy_from_slice(&U256::from(index).to_be_bytes::<32>());
    buf[32..52].copy_from_slice(address.as_slice());
    buf[52..].copy_from_slice(&amount.to_be_bytes::<32>());
    keccak256(buf)
}

/// Keccak256 of two nodes, smaller value first.
#[must_use]
pub fn hash_pair(a: &B256, b: &B256) -> B256 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(lo.as_slice());
    buf[32..].copy_from_slice(hi.as_slice());
    keccak256(buf)
}

/// Recompute the root from a leaf and its sibling list.
///
/// Folds with the same sort-pairs rule used during construction; no
/// left/right bookkeeping is needed.
#[must_use]
pub fn verify_proof(leaf: B256, proof: &[B256], root: B256) -> bool {
    proof.iter().fold(leaf, |acc, node| hash_pair(&acc, node)) == root
}

/// A sorted-pair Merkle tree over allocation leaves.
///
/// Every level is retained so per-leaf proofs can be extracted after
/// construction. The tree is write-once: identical leaves in identical
/// order always reproduce the identical root.
#[derive(Debug, Clone)]
pub struct DistributionTree {
    levels: Vec<Vec<B256>>,
}

impl DistributionTree {
    /// Build the tree over an allocation's leaf commitments.
    ///
    /// Leaves are taken in allocation-index order; they are never
    /// re-sorted.
    ///
    /// # Errors
    /// Returns [`TreeError::EmptyLeaves`] for an empty allocation.
    pub fn from_allocation(allocation: &Allocation) -> Result<Self, TreeError> {
        let leaves: Vec<B256> = allocation
            .entries
            .iter()
            .map(|e| leaf_hash(e.index, e.address, e.amount))
            .collect();
        Self::from_leaves(leaves)
    }

    /// Build the tree from precomputed leaf commitments.
    ///
    /// # Errors
    /// Returns [`TreeError::EmptyLeaves`] if `leaves` is empty.
    pub fn from_leaves(leaves: Vec<B256>) -> Result<Self, TreeError> {
        if leaves.is_empty() {
            return Err(TreeError::EmptyLeaves);
        }

        let mut levels = vec![leaves];
        while levels[levels.len() - 1].len() > 1 {
            let prev = &levels[levels.len() - 1];
            let mut next = Vec::with_capacity(prev.len().div_ceil(2));
            for chunk in prev.chunks(2) {
                if chunk.len() == 2 {
                    next.push(hash_pair(&chunk[0], &chunk[1]));
                } else {
                    // odd trailing node: promoted unchanged
                    next.push(chunk[0]);
                }
            }
            levels.push(next);
        }

        Ok(Self { levels })
    }

    /// The committed root.
    #[must_use]
    pub fn root(&self) -> B256 {
        self.levels[self.levels.len() - 1][0]
    }

    /// Number of leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// The leaf commitments in index order.
    #[must_use]
    pub fn leaves(&self) -> &[B256] {
        &self.levels[0]
    }

    /// Sibling hashes for `index`, leaf-to-root order.
    ///
    /// A lone promoted node has no sibling at that level and contributes
    /// nothing to the proof.
    ///
    /// # Errors
    /// Returns [`TreeError::IndexOutOfRange`] if `index` is not a leaf
    /// position.
    pub fn proof(&self, index: usize) -> Result<Vec<B256>, TreeError> {
        let leaf_count = self.leaf_count();
        if index >= leaf_count {
            return Err(TreeError::IndexOutOfRange { index, leaf_count });
        }

        let mut proof = Vec::new();
        let mut pos = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = pos ^ 1;
            if sibling < level.len() {
                proof.push(level[sibling]);
            }
            pos /= 2;
        }

        Ok(proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_leaves(n: usize) -> Vec<B256> {
        (0..n)
            .map(|i| leaf_hash(i as u64, Address::repeat_byte(i as u8 + 1), U256::from(i + 1)))
            .collect()
    }

    #[test]
    fn test_leaf_hash_layout() {
        // index 1, address 0xaa.., amount 2 packed into 84 bytes
        let address = Address::repeat_byte(0xaa);
        let mut expected = [0u8; 84];
        expected[31] = 1;
        expected[32..52].copy_from_slice(address.as_slice());
        expected[83] = 2;

        assert_eq!(
            leaf_hash(1, address, U256::from(2)),
            keccak256(expected)
        );
    }

    #[test]
    fn test_leaf_hash_binds_index() {
        let address = Address::repeat_byte(0xaa);
        let amount = U256::from(100);
        assert_ne!(leaf_hash(0, address, amount), leaf_hash(1, address, amount));
    }

    #[test]
    fn test_hash_pair_is_order_independent() {
        let a = B256::repeat_byte(0x01);
        let b = B256::repeat_byte(0x02);
        assert_eq!(hash_pair(&a, &b), hash_pair(&b, &a));
    }

    #[test]
    fn test_empty_leaves_rejected() {
        let err = DistributionTree::from_leaves(vec![]).unwrap_err();
        assert_eq!(err, TreeError::EmptyLeaves);
    }

    #[test]
    fn test_single_leaf_root_is_leaf() {
        let leaves = test_leaves(1);
        let tree = DistributionTree::from_leaves(leaves.clone()).unwrap();

        assert_eq!(tree.root(), leaves[0]);
        assert_eq!(tree.proof(0).unwrap(), Vec::<B256>::new());
    }

    #[test]
    fn test_two_leaf_tree() {
        let leaves = test_leaves(2);
        let tree = DistributionTree::from_leaves(leaves.clone()).unwrap();

        assert_eq!(tree.root(), hash_pair(&leaves[0], &leaves[1]));
        assert_eq!(tree.proof(0).unwrap(), vec![leaves[1]]);
        assert_eq!(tree.proof(1).unwrap(), vec![leaves[0]]);
    }

    #[test]
    fn test_odd_leaf_promoted_unchanged() {
        let leaves = test_leaves(3);
        let tree = DistributionTree::from_leaves(leaves.clone()).unwrap();

        // level 1 = [hash(l0, l1), l2]; root = hash(level1[0], l2)
        let pair = hash_pair(&leaves[0], &leaves[1]);
        assert_eq!(tree.root(), hash_pair(&pair, &leaves[2]));

        // the lone leaf has no sibling at level 0
        assert_eq!(tree.proof(2).unwrap(), vec![pair]);
    }

    #[test]
    fn test_all_proofs_recompute_root() {
        for n in 1..=17 {
            let leaves = test_leaves(n);
            let tree = DistributionTree::from_leaves(leaves.clone()).unwrap();
            let root = tree.root();

            for (i, leaf) in leaves.iter().enumerate() {
                let proof = tree.proof(i).unwrap();
                assert!(
                    verify_proof(*leaf, &proof, root),
                    "proof for leaf {i} of {n} failed"
                );
            }
        }
    }

    #[test]
    fn test_proof_rejected_for_other_leaf() {
        let leaves = test_leaves(8);
        let tree = DistributionTree::from_leaves(leaves.clone()).unwrap();
        let root = tree.root();

        let proof_for_3 = tree.proof(3).unwrap();
        for (i, leaf) in leaves.iter().enumerate() {
            if i != 3 {
                assert!(!verify_proof(*leaf, &proof_for_3, root));
            }
        }
    }

    #[test]
    fn test_proof_index_out_of_range() {
        let tree = DistributionTree::from_leaves(test_leaves(4)).unwrap();
        let err = tree.proof(4).unwrap_err();
        assert_eq!(
            err,
            TreeError::IndexOutOfRange {
                index: 4,
                leaf_count: 4
            }
        );
    }

    #[test]
    fn test_deterministic_root() {
        let tree_a = DistributionTree::from_leaves(test_leaves(9)).unwrap();
        let tree_b = DistributionTree::from_leaves(test_leaves(9)).unwrap();
        assert_eq!(tree_a.root(), tree_b.root());
    }
}
