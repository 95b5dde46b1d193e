//! An incremental, fixed-depth Merkle accumulator of commitments.

// SUBMODULES
// ================================================================================================

mod accumulator;
mod error;
mod index;
mod proof;
mod store;
mod walker;
mod zeros;


// REEXPORTS
// ================================================================================================

pub use accumulator::CommitmentTree;
pub use error::{MerkleError, ProofError, UpdateError, ZeroValuesError};
pub use index::NodeIndex;
pub use proof::InclusionProof;
pub use store::{MemoryNodeStore, NodeStore};
pub use walker::{PathStep, PathWalker};
pub use zeros::ZeroValues;

// CONSTANTS
// ================================================================================================

/// Maximum depth of a commitment tree; leaf positions are addressed with `u64`.
pub const MAX_DEPTH: u8 = 64;

/// Conventional depth of a commitment pool tree, with room for 2^20 commitments.
pub const DEFAULT_DEPTH: u8 = 20;

// HELPER FUNCTIONS
// ================================================================================================

#[cfg(test)]
fn int_to_leaf(value: u64) -> crate::hash::RpoDigest {
    use crate::hash::{ElementHasher, Rp64_256};

    Rp64_256::hash_elements(&[crate::Felt::new(value)])
}

#[cfg(test)]
fn rpo_zeros(depth: u8) -> ZeroValues<crate::hash::RpoDigest> {
    ZeroValues::compute(&crate::hash::Rpo::new(), Default::default(), depth).unwrap()
}
