#![no_main]

use commitment_tree::{
    Felt,
    hash::{Rpo, RpoDigest},
    merkle::{CommitmentTree, ZeroValues},
};
use libfuzzer_sys::fuzz_target;

const DEPTH: u8 = 6;

fuzz_target!(|data: &[u8]| {
    let oracle = Rpo::new();
    let zeros = ZeroValues::compute(&oracle, RpoDigest::default(), DEPTH).unwrap();
    let mut tree = CommitmentTree::new(oracle, zeros.clone());
    let mut leaves = Vec::new();

    // every 2-byte chunk is either an append or a replace
    for chunk in data.chunks_exact(2) {
        let leaf = oracle.hash_elements(&[Felt::new(chunk[1] as u64)]);
        if chunk[0] & 1 == 0 || leaves.is_empty() {
            match tree.append(leaf) {
                Ok(position) => {
                    assert_eq!(position, leaves.len() as u64);
                    leaves.push(leaf);
                },
                Err(_) => assert!(tree.is_full()),
            }
        } else {
            let position = (chunk[0] >> 1) as usize % leaves.len();
            tree.replace(position as u64, leaf).unwrap();
            leaves[position] = leaf;
        }
    }

    let rebuilt = CommitmentTree::with_leaves(oracle, zeros, leaves.iter().copied()).unwrap();
    assert_eq!(tree.root(), rebuilt.root());

    for position in 0..tree.num_leaves() {
        tree.proof(position).unwrap().verify(&oracle, &tree.root()).unwrap();
    }
});
