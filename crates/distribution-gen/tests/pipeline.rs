//! End-to-end pipeline tests: snapshot in, verified claims out.

use alloy_primitives::{address, Address, U256};
use distribution_gen::{
    allocate, build_distribution, leaf_hash, verify_proof, DistributionTree, HolderBalance,
};

fn two_holder_snapshot() -> Vec<HolderBalance> {
    vec![
        HolderBalance::new(
            address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
            U256::from(100),
        ),
        HolderBalance::new(
            address!("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
            U256::from(300),
        ),
    ]
}

#[test]
fn test_concrete_scenario_allocates_250_750() {
    let bundle = build_distribution(&two_holder_snapshot(), U256::from(1000)).unwrap();

    let a = bundle
        .claim("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")
        .unwrap();
    let b = bundle
        .claim("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb")
        .unwrap();

    assert_eq!(a.amount, U256::from(250));
    assert_eq!(b.amount, U256::from(750));
    assert_eq!(bundle.achieved_total, U256::from(1000));
}

#[test]
fn test_every_claim_proves_against_the_published_root() {
    let holders: Vec<HolderBalance> = (0u64..23)
        .map(|i| {
            HolderBalance::new(
                Address::with_last_byte(u8::try_from(i + 1).unwrap()),
                U256::from((i + 1) * 1_000_000),
            )
        })
        .collect();

    let bundle = build_distribution(&holders, U256::from(10).pow(U256::from(24))).unwrap();

    for holder in &holders {
        let claim = bundle.claim(&format!("{:#x}", holder.address)).unwrap();
        let leaf = leaf_hash(claim.index, holder.address, claim.amount);
        assert!(verify_proof(leaf, &claim.proof, bundle.merkle_root));
    }
}

#[test]
fn test_identical_input_reproduces_identical_output() {
    let holders = two_holder_snapshot();
    let first = build_distribution(&holders, U256::from(1000)).unwrap();
    let second = build_distribution(&holders, U256::from(1000)).unwrap();

    assert_eq!(first.merkle_root, second.merkle_root);
    assert_eq!(first.claims, second.claims);
}

#[test]
fn test_reordering_holders_changes_the_root() {
    let holders = two_holder_snapshot();
    let mut reversed = holders.clone();
    reversed.reverse();

    let forward = build_distribution(&holders, U256::from(1000)).unwrap();
    let backward = build_distribution(&reversed, U256::from(1000)).unwrap();

    // indices are baked into the leaves, so ordering is load-bearing
    assert_ne!(forward.merkle_root, backward.merkle_root);
}

#[test]
fn test_single_holder_distribution() {
    let holders = vec![HolderBalance::new(
        Address::repeat_byte(0xaa),
        U256::from(42),
    )];
    let bundle = build_distribution(&holders, U256::from(1000)).unwrap();
    let claim = bundle.claims.values().next().unwrap();

    assert_eq!(claim.amount, U256::from(1000));
    assert!(claim.proof.is_empty());
    assert_eq!(
        bundle.merkle_root,
        leaf_hash(0, Address::repeat_byte(0xaa), U256::from(1000))
    );
}

#[test]
fn test_allocation_feeds_tree_by_index() {
    let holders = two_holder_snapshot();
    let allocation = allocate(&holders, U256::from(1000)).unwrap();
    let tree = DistributionTree::from_allocation(&allocation).unwrap();

    let expected = leaf_hash(0, holders[0].address, U256::from(250));
    assert_eq!(tree.leaves()[0], expected);
}

#[test]
fn test_bundle_serializes_for_the_claim_ui() {
    let bundle = build_distribution(&two_holder_snapshot(), U256::from(1000)).unwrap();
    let json = serde_json::to_value(&bundle).unwrap();

    let claims = json.get("claims").unwrap().as_object().unwrap();
    assert!(claims.contains_key("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"));

    let record = &claims["0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"];
    assert_eq!(record["index"], 0);
    assert!(record["proof"].is_array());
}
