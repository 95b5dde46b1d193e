use alloc::{string::ToString, vec::Vec};

use super::{MAX_DEPTH, MerkleError, NodeIndex, ProofError};
use crate::{
    hash::HashOracle,
    utils::{ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable},
};

// INCLUSION PROOF
// ================================================================================================

/// Proof that a leaf is part of a commitment tree with a given root.
///
/// `siblings` are ordered from the leaf level up to the level just below the root. The side of
/// the path node at every level is not stored: it is bit `i` of the leaf position, so a proof
/// cannot claim a position other than the one its root was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawInclusionProof<D>"))]
pub struct InclusionProof<D> {
    root: D,
    leaf: D,
    position: u64,
    siblings: Vec<D>,
}

impl<D> InclusionProof<D> {
    /// Returns a new proof for `leaf` at `position`.
    ///
    /// # Errors
    /// Returns an error if:
    /// - there are more than [MAX_DEPTH] siblings.
    /// - `position` does not address a leaf of a tree whose depth is the number of siblings.
    pub fn new(root: D, leaf: D, position: u64, siblings: Vec<D>) -> Result<Self, MerkleError> {
        let depth = u8::try_from(siblings.len())
            .ok()
            .filter(|&depth| depth <= MAX_DEPTH)
            .ok_or(MerkleError::PathTooLong(siblings.len()))?;
        if depth < MAX_DEPTH && position >> depth != 0 {
            return Err(MerkleError::InvalidLeafPosition { position, depth });
        }

        Ok(Self { root, leaf, position, siblings })
    }

    /// Returns the root of the tree at the time the proof was produced.
    pub fn root(&self) -> &D {
        &self.root
    }

    /// Returns the leaf being proven.
    pub fn leaf(&self) -> &D {
        &self.leaf
    }

    /// Returns the position of the leaf.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Returns the siblings of the path nodes, deepest first.
    pub fn siblings(&self) -> &[D] {
        &self.siblings
    }

    /// Returns the number of levels covered by this proof.
    pub fn depth(&self) -> u8 {
        // bounded by MAX_DEPTH on construction
        self.siblings.len() as u8
    }

    /// Returns, for every level, `0` when the path node is a left child and `1` when it is a
    /// right child.
    pub fn directions(&self) -> impl ExactSizeIterator<Item = u8> + '_ {
        (0..self.siblings.len()).map(move |level| ((self.position >> level) & 1) as u8)
    }

    /// Returns, for every level, whether the path node is a left child.
    ///
    /// This is the boolean form of [InclusionProof::directions] expected by proving circuits that
    /// take an `is_even` array next to the path.
    pub fn is_even(&self) -> impl ExactSizeIterator<Item = bool> + '_ {
        self.directions().map(|bit| bit == 0)
    }

    /// Consumes the proof and returns its root, leaf, position and siblings.
    pub fn into_parts(self) -> (D, D, u64, Vec<D>) {
        (self.root, self.leaf, self.position, self.siblings)
    }
}

impl<D: Copy + Eq + core::fmt::Debug> InclusionProof<D> {
    /// Recomputes the root from the leaf, its position and the siblings.
    ///
    /// # Errors
    /// Returns an error if the oracle fails.
    pub fn compute_root<O>(&self, oracle: &O) -> Result<D, ProofError<D, O::Error>>
    where
        O: HashOracle<Digest = D>,
    {
        self.siblings.iter().enumerate().try_fold(self.leaf, |node, (level, &sibling)| {
            let index = NodeIndex::new(level as u8, self.position >> level);
            let [left, right] = index.build_node(node, sibling);
            oracle.merge(left, right).map_err(ProofError::Oracle)
        })
    }

    /// Verifies this proof against the provided root.
    ///
    /// # Errors
    /// Returns an error if:
    /// - the oracle fails.
    /// - the root computed from the proof differs from `root`.
    pub fn verify<O>(&self, oracle: &O, root: &D) -> Result<(), ProofError<D, O::Error>>
    where
        O: HashOracle<Digest = D>,
    {
        let computed_root = self.compute_root(oracle)?;
        if &computed_root != root {
            return Err(ProofError::ConflictingRoots {
                expected_root: *root,
                actual_root: computed_root,
            });
        }

        Ok(())
    }
}

/// Unchecked form of an [InclusionProof], validated on deserialization.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawInclusionProof<D> {
    root: D,
    leaf: D,
    position: u64,
    siblings: Vec<D>,
}

#[cfg(feature = "serde")]
impl<D> TryFrom<RawInclusionProof<D>> for InclusionProof<D> {
    type Error = MerkleError;

    fn try_from(raw: RawInclusionProof<D>) -> Result<Self, Self::Error> {
        Self::new(raw.root, raw.leaf, raw.position, raw.siblings)
    }
}

// SERIALIZATION
// ================================================================================================

impl<D: Serializable> Serializable for InclusionProof<D> {
    fn write_into<W: ByteWriter>(&self, target: &mut W) {
        self.root.write_into(target);
        self.leaf.write_into(target);
        target.write_u64(self.position);
        target.write_u8(self.depth());
        target.write_many(&self.siblings);
    }
}

impl<D: Deserializable> Deserializable for InclusionProof<D> {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let root = D::read_from(source)?;
        let leaf = D::read_from(source)?;
        let position = source.read_u64()?;
        let depth = source.read_u8()?;
        if depth > MAX_DEPTH {
            return Err(DeserializationError::InvalidValue(
                MerkleError::PathTooLong(depth as usize).to_string(),
            ));
        }
        let siblings = source.read_many::<D>(depth as usize)?;

        Self::new(root, leaf, position, siblings)
            .map_err(|err| DeserializationError::InvalidValue(err.to_string()))
    }
}

// TESTS
// ================================================================================================
