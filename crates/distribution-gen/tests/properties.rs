//! Property tests for the allocation and commitment invariants.

use alloy_primitives::{Address, U256};
use distribution_gen::{allocate, verify_proof, DistributionTree, HolderBalance};
use proptest::prelude::*;

fn holders_from(balances: &[u128]) -> Vec<HolderBalance> {
    balances
        .iter()
        .enumerate()
        .map(|(i, balance)| {
            let mut bytes = [0u8; 20];
            bytes[12..].copy_from_slice(&(i as u64 + 1).to_be_bytes());
            HolderBalance::new(Address::from_slice(&bytes), U256::from(*balance))
        })
        .collect()
}

proptest! {
    #[test]
    fn conservation_bound_holds(
        balances in prop::collection::vec(1u128..=u128::MAX / 64, 1..48),
        total in 1u128..=1_000_000_000_000_000_000_000_000_000u128,
    ) {
        let holders = holders_from(&balances);
        let allocation = allocate(&holders, U256::from(total)).unwrap();

        prop_assert!(allocation.achieved_total <= allocation.requested_total);
        prop_assert!(allocation.shortfall() < U256::from(holders.len()));
    }

    #[test]
    fn doubled_balance_doubles_the_amount(
        base in 1u128..=u128::MAX / 8,
        total in 1u128..=1_000_000_000_000_000_000_000_000_000u128,
    ) {
        let holders = holders_from(&[base, base * 2]);
        let allocation = allocate(&holders, U256::from(total)).unwrap();

        let single = allocation.entries[0].amount;
        let double = allocation.entries[1].amount;

        // floor(2x) is 2*floor(x) or 2*floor(x) + 1
        prop_assert!(double >= single * U256::from(2));
        prop_assert!(double <= single * U256::from(2) + U256::from(1));
    }

    #[test]
    fn allocation_is_deterministic(
        balances in prop::collection::vec(1u128..=u128::MAX / 64, 1..32),
        total in 1u128..=1_000_000_000_000_000_000_000_000_000u128,
    ) {
        let holders = holders_from(&balances);
        let first = allocate(&holders, U256::from(total)).unwrap();
        let second = allocate(&holders, U256::from(total)).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_leaf_proves_and_no_other_index_does(
        balances in prop::collection::vec(1u128..=u128::MAX / 64, 1..32),
        total in 1u128..=1_000_000_000_000_000_000_000_000_000u128,
    ) {
        let holders = holders_from(&balances);
        let allocation = allocate(&holders, U256::from(total)).unwrap();
        let tree = DistributionTree::from_allocation(&allocation).unwrap();
        let root = tree.root();
        let leaves = tree.leaves().to_vec();

        for (i, leaf) in leaves.iter().enumerate() {
            let proof = tree.proof(i).unwrap();
            prop_assert!(verify_proof(*leaf, &proof, root));

            // a proof is bound to its position
            let other = (i + 1) % leaves.len();
            if other != i && leaves[other] != *leaf {
                prop_assert!(!verify_proof(leaves[other], &proof, root));
            }
        }
    }
}
