use alloc::vec::Vec;

use tracing::{debug, trace};

use super::{
    InclusionProof, MemoryNodeStore, MerkleError, NodeIndex, NodeStore, PathWalker, UpdateError,
    ZeroValues,
};
use crate::hash::HashOracle;


// COMMITMENT TREE
// ================================================================================================

/// An append-only accumulator of commitments, authenticated by a fixed-depth binary Merkle tree.
///
/// Leaves are appended one after another at the first free position, so the occupied positions
/// are always `0..num_leaves()` without gaps. An existing leaf can be replaced in place; there is
/// no deletion. Every mutation walks from the leaf to the root, recomputing each ancestor with the
/// tree's [HashOracle] and writing all of them back to the [NodeStore] in a single batch.
///
/// Nodes that were never written are read as the empty-subtree value of their level, taken from
/// the [ZeroValues] table the tree was created with. The root is never cached outside of the
/// store: [CommitmentTree::root] reads the node at `(depth, 0)`.
///
/// Mutations must be serialized by the caller. Within one mutation the oracle is invoked level by
/// level, each call depending on the result of the previous one.
#[derive(Debug, Clone)]
pub struct CommitmentTree<O: HashOracle, S = MemoryNodeStore<<O as HashOracle>::Digest>> {
    oracle: O,
    zeros: ZeroValues<O::Digest>,
    store: S,
    num_leaves: u64,
}

impl<O: HashOracle> CommitmentTree<O> {
    // CONSTRUCTORS
    // --------------------------------------------------------------------------------------------

    /// Returns an empty tree backed by an in-memory store.
    ///
    /// The depth of the tree is the depth of the `zeros` table.
    pub fn new(oracle: O, zeros: ZeroValues<O::Digest>) -> Self {
        Self::with_store(oracle, zeros, MemoryNodeStore::new())
    }

    /// Returns a tree backed by an in-memory store and holding the provided leaves at positions
    /// `0..leaves.len()`.
    ///
    /// # Errors
    /// Returns an error if the tree cannot fit all leaves, or if the oracle fails.
    pub fn with_leaves(
        oracle: O,
        zeros: ZeroValues<O::Digest>,
        leaves: impl IntoIterator<Item = O::Digest>,
    ) -> Result<Self, UpdateError<O::Error>> {
        let mut tree = Self::new(oracle, zeros);
        tree.init(leaves)?;
        Ok(tree)
    }
}

impl<O: HashOracle, S: NodeStore<O::Digest>> CommitmentTree<O, S> {
    /// Returns a tree on top of the provided store.
    ///
    /// The store may already contain the nodes of a tree built with the same oracle and zero
    /// values; the number of leaves is recovered by counting the contiguous leaves at the start of
    /// the leaf level.
    pub fn with_store(oracle: O, zeros: ZeroValues<O::Digest>, store: S) -> Self {
        let num_leaves = (0..)
            .take_while(|&position| store.get_node(NodeIndex::leaf(position)).is_some())
            .count() as u64;

        Self { oracle, zeros, store, num_leaves }
    }

    // PUBLIC ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns the depth of the tree, i.e. the length of every authentication path.
    pub fn depth(&self) -> u8 {
        self.zeros.depth()
    }

    /// Returns the number of leaves appended so far, which is also the position of the next leaf.
    pub fn num_leaves(&self) -> u64 {
        self.num_leaves
    }

    /// Returns the maximum number of leaves the tree can hold.
    pub fn capacity(&self) -> u128 {
        1u128 << self.depth()
    }

    /// Returns true if no more leaves can be appended.
    pub fn is_full(&self) -> bool {
        self.num_leaves as u128 >= self.capacity()
    }

    /// Returns the empty-subtree values this tree was created with.
    pub fn zeros(&self) -> &ZeroValues<O::Digest> {
        &self.zeros
    }

    /// Returns the hash oracle of this tree.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Returns the underlying node store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the current root of the tree.
    ///
    /// For a tree to which nothing was ever written, this is the empty-tree value of the zero
    /// table.
    pub fn root(&self) -> O::Digest {
        self.node_or_zero(NodeIndex::root(self.depth()))
    }

    /// Returns the node at the specified index.
    ///
    /// # Errors
    /// Returns an error if the index does not address a node of this tree.
    pub fn get_node(&self, index: NodeIndex) -> Result<O::Digest, MerkleError> {
        let depth = self.depth();
        let in_bounds = index.level() <= depth
            && (index.position() as u128) < (1u128 << (depth - index.level()));
        if !in_bounds {
            return Err(MerkleError::InvalidNodeIndex(index));
        }

        Ok(self.node_or_zero(index))
    }

    /// Returns the leaf at the specified position, or `None` if it has not been appended.
    pub fn get_leaf(&self, position: u64) -> Option<O::Digest> {
        if position >= self.num_leaves {
            return None;
        }
        self.store.get_node(NodeIndex::leaf(position))
    }

    /// Returns an iterator over the appended leaves and their positions.
    pub fn leaves(&self) -> impl Iterator<Item = (u64, O::Digest)> + '_ {
        (0..self.num_leaves)
            .map(|position| (position, self.node_or_zero(NodeIndex::leaf(position))))
    }

    /// Returns the smallest position holding a leaf equal to `leaf`, or `None` if there is none.
    ///
    /// This scans the leaf level, so it runs in time linear in the number of leaves.
    pub fn find(&self, leaf: &O::Digest) -> Option<u64> {
        (0..self.num_leaves)
            .find(|&position| self.store.get_node(NodeIndex::leaf(position)).as_ref() == Some(leaf))
    }

    /// Returns an inclusion proof for the leaf at the specified position against the current root.
    ///
    /// # Errors
    /// Returns an error if no leaf is stored at `position`.
    pub fn proof(&self, position: u64) -> Result<InclusionProof<O::Digest>, MerkleError> {
        let leaf = self.get_leaf(position).ok_or(MerkleError::LeafNotFound(position))?;

        let siblings = PathWalker::new(position, self.depth())
            .map(|step| self.node_or_zero(step.sibling))
            .collect();

        InclusionProof::new(self.root(), leaf, position, siblings)
    }

    /// Looks up `leaf` and returns an inclusion proof for its first occurrence.
    ///
    /// # Errors
    /// Returns an error if `leaf` is not stored in the tree.
    pub fn open(&self, leaf: &O::Digest) -> Result<InclusionProof<O::Digest>, MerkleError> {
        let position = self.find(leaf).ok_or(MerkleError::CommitmentNotFound)?;
        self.proof(position)
    }

    // STATE MUTATORS
    // --------------------------------------------------------------------------------------------

    /// Fills an empty tree with the provided leaves, building every level bottom-up.
    ///
    /// Level `l` receives `ceil(n / 2^l)` nodes; children past the end of the level below are
    /// taken from the zero table. Nodes of one level are independent of each other and are hashed
    /// in parallel when the `concurrent` feature is enabled. Nothing is written unless every node
    /// was computed.
    ///
    /// Providing no leaves is a no-op.
    ///
    /// # Errors
    /// Returns an error if:
    /// - the tree already holds leaves.
    /// - there are more leaves than the tree can hold.
    /// - the oracle fails.
    pub fn init(
        &mut self,
        leaves: impl IntoIterator<Item = O::Digest>,
    ) -> Result<(), UpdateError<O::Error>> {
        let leaves: Vec<O::Digest> = leaves.into_iter().collect();
        if leaves.is_empty() {
            return Ok(());
        }
        if self.num_leaves != 0 {
            return Err(MerkleError::AlreadyInitialized(self.num_leaves).into());
        }
        if leaves.len() as u128 > self.capacity() {
            return Err(MerkleError::TreeFull(self.depth()).into());
        }

        let num_leaves = leaves.len() as u64;
        let mut updates: Vec<(NodeIndex, O::Digest)> = Vec::with_capacity(leaves.len() * 2);
        updates.extend(
            leaves.iter().enumerate().map(|(i, &leaf)| (NodeIndex::leaf(i as u64), leaf)),
        );

        let mut children = leaves;
        for level in 1..=self.depth() {
            let zero = self.zeros.get(level - 1);
            let parents = merge_level(&self.oracle, &children, zero).map_err(UpdateError::Oracle)?;
            trace!(level, num_nodes = parents.len(), "built tree level");

            updates.extend(
                parents
                    .iter()
                    .enumerate()
                    .map(|(i, &node)| (NodeIndex::new(level, i as u64), node)),
            );
            children = parents;
        }

        self.store.set_nodes(updates);
        self.num_leaves = num_leaves;
        debug!(num_leaves, depth = self.depth(), "initialized commitment tree");

        Ok(())
    }

    /// Appends a leaf at the next free position and returns that position.
    ///
    /// # Errors
    /// Returns an error if the tree is full, or if the oracle fails. In both cases the tree is
    /// left unchanged.
    pub fn append(&mut self, leaf: O::Digest) -> Result<u64, UpdateError<O::Error>> {
        if self.is_full() {
            return Err(MerkleError::TreeFull(self.depth()).into());
        }

        let position = self.num_leaves;
        let updates = self.path_updates(position, leaf).map_err(UpdateError::Oracle)?;
        self.store.set_nodes(updates);
        self.num_leaves += 1;
        debug!(position, depth = self.depth(), "appended leaf");

        Ok(position)
    }

    /// Replaces the leaf at `position` and recomputes its ancestors.
    ///
    /// # Errors
    /// Returns an error if no leaf has been appended at `position`, or if the oracle fails. In
    /// both cases the tree is left unchanged.
    pub fn replace(
        &mut self,
        position: u64,
        leaf: O::Digest,
    ) -> Result<(), UpdateError<O::Error>> {
        if position >= self.num_leaves {
            let num_leaves = self.num_leaves;
            return Err(MerkleError::LeafNotAppended { position, num_leaves }.into());
        }

        let updates = self.path_updates(position, leaf).map_err(UpdateError::Oracle)?;
        self.store.set_nodes(updates);
        debug!(position, depth = self.depth(), "replaced leaf");

        Ok(())
    }

    // HELPER METHODS
    // --------------------------------------------------------------------------------------------

    /// Returns the stored node at `index`, or the empty-subtree value of its level.
    fn node_or_zero(&self, index: NodeIndex) -> O::Digest {
        self.store.get_node(index).unwrap_or_else(|| self.zeros.get(index.level()))
    }

    /// Computes the writes needed to place `leaf` at `position`: the new value of every node on
    /// the path, followed by the new root.
    ///
    /// Nothing is written here, so a failing oracle leaves the store untouched.
    fn path_updates(
        &self,
        position: u64,
        leaf: O::Digest,
    ) -> Result<Vec<(NodeIndex, O::Digest)>, O::Error> {
        let depth = self.depth();
        let mut updates = Vec::with_capacity(depth as usize + 1);

        let mut current = leaf;
        for step in PathWalker::new(position, depth) {
            let sibling = self.node_or_zero(step.sibling);
            let [left, right] = step.node.build_node(current, sibling);
            updates.push((step.node, current));
            current = self.oracle.merge(left, right)?;
            let parent = step.node.parent();
            trace!(level = parent.level(), position = parent.position(), "recomputed ancestor");
        }
        updates.push((NodeIndex::root(depth), current));

        Ok(updates)
    }
}

// HELPER FUNCTIONS
// ================================================================================================

/// Merges adjacent pairs of `children`, padding an odd tail with `zero`.
#[cfg(feature = "concurrent")]
fn merge_level<O: HashOracle>(
    oracle: &O,
    children: &[O::Digest],
    zero: O::Digest,
) -> Result<Vec<O::Digest>, O::Error> {
    use rayon::prelude::*;

    children.par_chunks(2).map(|pair| merge_pair(oracle, pair, zero)).collect()
}

/// Merges adjacent pairs of `children`, padding an odd tail with `zero`.
#[cfg(not(feature = "concurrent"))]
fn merge_level<O: HashOracle>(
    oracle: &O,
    children: &[O::Digest],
    zero: O::Digest,
) -> Result<Vec<O::Digest>, O::Error> {
    children.chunks(2).map(|pair| merge_pair(oracle, pair, zero)).collect()
}

fn merge_pair<O: HashOracle>(
    oracle: &O,
    pair: &[O::Digest],
    zero: O::Digest,
) -> Result<O::Digest, O::Error> {
    let right = pair.get(1).copied().unwrap_or(zero);
    oracle.merge(pair[0], right)
}
