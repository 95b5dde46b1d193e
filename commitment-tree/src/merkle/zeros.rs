use alloc::{sync::Arc, vec::Vec};
use core::ops::Deref;

use super::{MAX_DEPTH, MerkleError, ZeroValuesError};
use crate::{
    hash::HashOracle,
    utils::{Deserializable, HexParseError, hex_to_value},
};

// ZERO VALUES
// ================================================================================================

/// Values of the empty subtrees of a fixed-depth tree, one per level.
///
/// `zeros[0]` is the value of an empty leaf, and for every level `l > 0` the table is expected to
/// satisfy `zeros[l] = merge(zeros[l - 1], zeros[l - 1])`. The table is supplied by the caller;
/// the tree relies on the recurrence but does not check it. Use [ZeroValues::verify] to check a
/// table obtained from an untrusted source.
///
/// The table is immutable and reference counted, so one table can back any number of trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroValues<D> {
    values: Arc<[D]>,
    depth: u8,
}

impl<D: Copy> ZeroValues<D> {
    // CONSTRUCTORS
    // --------------------------------------------------------------------------------------------

    /// Returns a table for a tree of the given depth.
    ///
    /// Entries past `values[depth]` are accepted and ignored, so a single published table can be
    /// used for trees of any smaller depth.
    ///
    /// # Errors
    /// Returns an error if:
    /// - `depth` is greater than [MAX_DEPTH].
    /// - fewer than `depth + 1` values are provided.
    pub fn new(depth: u8, values: impl Into<Vec<D>>) -> Result<Self, MerkleError> {
        if depth > MAX_DEPTH {
            return Err(MerkleError::DepthTooBig(depth));
        }

        let mut values = values.into();
        if values.len() < depth as usize + 1 {
            return Err(MerkleError::InsufficientZeroValues { depth, provided: values.len() });
        }
        values.truncate(depth as usize + 1);

        Ok(Self { values: values.into(), depth })
    }

    /// Derives the table for a tree of the given depth from the value of an empty leaf.
    ///
    /// # Errors
    /// Returns an error if `depth` is greater than [MAX_DEPTH], or if the oracle fails.
    pub fn compute<O>(
        oracle: &O,
        empty_leaf: D,
        depth: u8,
    ) -> Result<Self, ZeroValuesError<O::Error>>
    where
        O: HashOracle<Digest = D>,
    {
        if depth > MAX_DEPTH {
            return Err(MerkleError::DepthTooBig(depth).into());
        }

        let mut values = Vec::with_capacity(depth as usize + 1);
        let mut current = empty_leaf;
        values.push(current);
        for _ in 0..depth {
            current = oracle.merge(current, current).map_err(ZeroValuesError::Value)?;
            values.push(current);
        }

        Ok(Self { values: values.into(), depth })
    }

    // PUBLIC ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns the depth of the tree this table was built for.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Returns the value of an empty subtree rooted at `level`.
    ///
    /// # Panics
    /// Panics if `level` is greater than the depth of the table.
    pub fn get(&self, level: u8) -> D {
        self.values[level as usize]
    }

    /// Returns the value of an empty tree, i.e. the root of a tree with no leaves.
    pub fn root(&self) -> D {
        self.get(self.depth)
    }

    /// Returns the table as a slice, ordered from the leaf level up to the root level.
    pub fn as_slice(&self) -> &[D] {
        &self.values
    }

    /// Checks that every entry of the table is the merge of two copies of the entry below it.
    ///
    /// # Errors
    /// Returns an error naming the first level at which the recurrence does not hold, or if the
    /// oracle fails.
    pub fn verify<O>(&self, oracle: &O) -> Result<(), ZeroValuesError<O::Error>>
    where
        O: HashOracle<Digest = D>,
        D: PartialEq,
    {
        for (level, pair) in self.values.windows(2).enumerate() {
            let expected = oracle.merge(pair[0], pair[0]).map_err(ZeroValuesError::Value)?;
            if expected != pair[1] {
                return Err(ZeroValuesError::BrokenRecurrence(level as u8 + 1));
            }
        }
        Ok(())
    }
}

impl<D: Copy + Deserializable> ZeroValues<D> {
    /// Parses a table of `0x`-prefixed, 32-byte hex strings, ordered from the leaf level up.
    ///
    /// # Errors
    /// Returns an error if any string is not a valid encoding of a node, or if the table is too
    /// short for `depth`.
    pub fn from_hex(depth: u8, values: &[&str]) -> Result<Self, ZeroValuesError<HexParseError>> {
        let values = values
            .iter()
            .take(depth as usize + 1)
            .map(|value| hex_to_value(value))
            .collect::<Result<Vec<D>, _>>()
            .map_err(ZeroValuesError::Value)?;

        Ok(Self::new(depth, values)?)
    }
}

impl<D> Deref for ZeroValues<D> {
    type Target = [D];

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec::Vec};

    use assert_matches::assert_matches;
    use rstest::rstest;

    use super::*;
    use crate::{
        hash::{Digest, Rpo, RpoDigest},
        merkle::{int_to_leaf, rpo_zeros},
        utils::bytes_to_hex_string,
    };

    #[test]
    fn computed_table_satisfies_recurrence() {
        let oracle = Rpo::new();
        let zeros = ZeroValues::compute(&oracle, int_to_leaf(0), 8).unwrap();

        assert_eq!(zeros.depth(), 8);
        assert_eq!(zeros.len(), 9);
        assert_eq!(zeros.get(0), int_to_leaf(0));
        for level in 1..=8 {
            let below = zeros.get(level - 1);
            assert_eq!(zeros.get(level), oracle.merge(below, below).unwrap());
        }
        zeros.verify(&oracle).unwrap();
    }

    #[rstest]
    #[case(0, 0)]
    #[case(3, 3)]
    #[case(20, 1)]
    fn short_table_is_rejected(#[case] depth: u8, #[case] provided: usize) {
        let values = vec![RpoDigest::default(); provided];
        assert_eq!(
            ZeroValues::new(depth, values),
            Err(MerkleError::InsufficientZeroValues { depth, provided })
        );
    }

    #[test]
    fn long_table_is_truncated() {
        let full = rpo_zeros(10);
        let zeros = ZeroValues::new(4, full.as_slice()).unwrap();

        assert_eq!(zeros.depth(), 4);
        assert_eq!(zeros.as_slice(), &full[..5]);
        assert_eq!(zeros.root(), full[4]);
    }

    #[test]
    fn depth_is_bounded() {
        assert_eq!(
            ZeroValues::new(65, vec![RpoDigest::default(); 70]),
            Err(MerkleError::DepthTooBig(65))
        );
        assert_matches!(
            ZeroValues::compute(&Rpo::new(), RpoDigest::default(), 65),
            Err(ZeroValuesError::Merkle(MerkleError::DepthTooBig(65)))
        );
    }

    #[test]
    fn verify_detects_broken_recurrence() {
        let mut values = rpo_zeros(5).to_vec();
        values[3] = int_to_leaf(3);
        let zeros = ZeroValues::new(5, values).unwrap();

        assert_matches!(zeros.verify(&Rpo::new()), Err(ZeroValuesError::BrokenRecurrence(3)));
    }

    #[test]
    fn table_from_hex() {
        let expected = rpo_zeros(6);
        let encoded: Vec<String> =
            expected.iter().map(|value| bytes_to_hex_string(value.as_bytes())).collect();
        let encoded: Vec<&str> = encoded.iter().map(String::as_str).collect();

        let zeros = ZeroValues::<RpoDigest>::from_hex(6, &encoded).unwrap();
        assert_eq!(zeros, expected);

        let too_short = ZeroValues::<RpoDigest>::from_hex(7, &encoded);
        assert_matches!(
            too_short,
            Err(ZeroValuesError::Merkle(MerkleError::InsufficientZeroValues { depth: 7, .. }))
        );
        assert_matches!(
            ZeroValues::<RpoDigest>::from_hex(1, &["0x00", "0x01"]),
            Err(ZeroValuesError::Value(HexParseError::InvalidLength { .. }))
        );
    }
}
