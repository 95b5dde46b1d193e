use thiserror::Error;

use super::NodeIndex;

/// Errors that can occur when constructing or operating on a commitment tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MerkleError {
    /// The provided tree depth is too big.
    #[error("provided tree depth {0} is too big")]
    DepthTooBig(u8),

    /// The zero-value table is too short for the requested depth.
    #[error("{provided} zero values are not enough for a tree of depth {depth}")]
    InsufficientZeroValues {
        /// The requested tree depth.
        depth: u8,
        /// The number of zero values that were provided.
        provided: usize,
    },

    /// The node index does not address a node of the tree.
    #[error("node index `{0}` is not valid for the tree")]
    InvalidNodeIndex(NodeIndex),

    /// The leaf at the given position has not been appended yet.
    #[error("leaf {position} does not exist in a tree with {num_leaves} leaves; append it instead")]
    LeafNotAppended {
        /// The requested leaf position.
        position: u64,
        /// The number of leaves in the tree.
        num_leaves: u64,
    },

    /// No leaf is stored at the given position.
    #[error("leaf {0} not found in the tree")]
    LeafNotFound(u64),

    /// No leaf with the given value is stored in the tree.
    #[error("commitment is not a leaf of the tree")]
    CommitmentNotFound,

    /// The tree has no room for more leaves.
    #[error("tree of depth {0} has no free leaf positions left")]
    TreeFull(u8),

    /// An authentication path is longer than the deepest supported tree.
    #[error("path of {0} siblings exceeds the maximum tree depth")]
    PathTooLong(usize),

    /// A leaf position does not fit a tree of the given depth.
    #[error("leaf position {position} does not fit a tree of depth {depth}")]
    InvalidLeafPosition {
        /// The leaf position.
        position: u64,
        /// The depth of the tree.
        depth: u8,
    },

    /// Bulk initialization was requested on a tree that already holds leaves.
    #[error("tree already holds {0} leaves and cannot be bulk initialized")]
    AlreadyInitialized(u64),
}

/// Errors that can occur when mutating a commitment tree.
#[derive(Debug, Error)]
pub enum UpdateError<E> {
    /// The mutation was rejected before any hashing took place.
    #[error(transparent)]
    Merkle(#[from] MerkleError),

    /// The hash oracle failed while recomputing the tree; no node was written.
    #[error("hash oracle failed while recomputing the tree")]
    Oracle(#[source] E),
}

/// Errors that can occur when checking an inclusion proof.
#[derive(Debug, Error)]
pub enum ProofError<D: core::fmt::Debug, E> {
    /// The root computed from the proof does not match the expected root.
    #[error("expected merkle root {expected_root:?} found {actual_root:?}")]
    ConflictingRoots {
        /// The expected Merkle root.
        expected_root: D,
        /// The root that was computed from the proof.
        actual_root: D,
    },

    /// The hash oracle failed while recomputing the root.
    #[error("hash oracle failed while recomputing the root")]
    Oracle(#[source] E),
}

/// Errors that can occur when building or checking a [ZeroValues](super::ZeroValues) table.
#[derive(Debug, Error)]
pub enum ZeroValuesError<E> {
    /// The table does not fit the requested depth.
    #[error(transparent)]
    Merkle(#[from] MerkleError),

    /// The entry at the given level is not the merge of two copies of the entry below it.
    #[error("zero value at level {0} does not match the merge of the level below")]
    BrokenRecurrence(u8),

    /// The entries could not be produced.
    #[error("failed to produce a zero value")]
    Value(#[source] E),
}
