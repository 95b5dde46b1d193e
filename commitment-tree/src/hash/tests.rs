use super::*;
use crate::utils::Serializable;

fn felts(values: &[u64]) -> alloc::vec::Vec<Felt> {
    values.iter().map(|&value| Felt::new(value)).collect()
}

#[test]
fn merge_oracle_matches_hasher() {
    let oracle = Rpo::new();
    let left = Rp64_256::hash_elements(&felts(&[1, 2]));
    let right = Rp64_256::hash_elements(&felts(&[3, 4]));

    assert_eq!(oracle.merge(left, right).unwrap(), Rp64_256::merge(&[left, right]));
    assert_ne!(oracle.merge(left, right).unwrap(), oracle.merge(right, left).unwrap());
}

#[test]
fn oracle_by_reference() {
    fn merge_twice<O: HashOracle>(oracle: O, node: O::Digest) -> O::Digest {
        let parent = oracle.merge(node, node).unwrap();
        oracle.merge(parent, parent).unwrap()
    }

    let oracle = Rpo::new();
    let leaf = oracle.hash_elements(&felts(&[7]));
    assert_eq!(merge_twice(&oracle, leaf), merge_twice(oracle, leaf));
}

#[test]
fn hash_elements_is_deterministic() {
    let oracle = Rpo::new();

    assert_eq!(oracle.hash_elements(&felts(&[5, 6])), oracle.hash_elements(&felts(&[5, 6])));
    assert_ne!(oracle.hash_elements(&felts(&[5, 6])), oracle.hash_elements(&felts(&[6, 5])));
    assert_eq!(oracle.hash_elements(&felts(&[9])), Rp64_256::hash_elements(&felts(&[9])));
}

#[test]
fn blake3_oracle() {
    let oracle = Blake3::new();
    let left = oracle.hash_elements(&felts(&[1]));
    let right = oracle.hash_elements(&felts(&[2]));

    // blake3 merges the concatenation of both 32-byte digests
    let mut bytes = left.to_bytes();
    bytes.extend_from_slice(&right.to_bytes());
    let expected = Blake3_256::<Felt>::hash(&bytes);

    assert_eq!(oracle.merge(left, right).unwrap(), expected);
}

#[test]
fn oracle_debug_names_hasher() {
    let debug = format!("{:?}", Rpo::new());
    assert!(debug.starts_with("MergeOracle("));
    assert!(debug.contains("Rp64_256"));
}
