use super::NodeIndex;
use crate::Map;

// NODE STORE
// ================================================================================================

/// Sparse storage for the nodes of a commitment tree.
///
/// Only nodes that have been written are stored. A missing node is not an error: the tree reads
/// it as the empty-subtree value of its level. Implementations therefore never need to store
/// zero values.
///
/// A single mutation of the tree produces one node per level plus the root; these are handed to
/// [NodeStore::set_nodes] in one call and must be applied as a unit.
pub trait NodeStore<D> {
    /// Returns the node at `index`, or `None` if it was never written.
    fn get_node(&self, index: NodeIndex) -> Option<D>;

    /// Writes all `nodes`, overwriting any nodes already stored at the same indices.
    fn set_nodes<I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = (NodeIndex, D)>;

    /// Returns the number of nodes currently stored.
    fn num_nodes(&self) -> usize;
}

// MEMORY NODE STORE
// ================================================================================================

/// In-memory [NodeStore] backed by a map keyed by [NodeIndex].
///
/// This is the default store of a commitment tree. It is suitable whenever the tree is rebuilt
/// from its leaves on start-up, or when a higher-level component handles persistence on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryNodeStore<D> {
    nodes: Map<NodeIndex, D>,
}

impl<D> MemoryNodeStore<D> {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self { nodes: Map::new() }
    }

    /// Returns an iterator over all stored nodes and their indices.
    ///
    /// The iteration order depends on the map backend and must not be relied upon.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeIndex, &D)> {
        self.nodes.iter()
    }
}

impl<D> Default for MemoryNodeStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Copy> NodeStore<D> for MemoryNodeStore<D> {
    fn get_node(&self, index: NodeIndex) -> Option<D> {
        self.nodes.get(&index).copied()
    }

    fn set_nodes<I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = (NodeIndex, D)>,
    {
        self.nodes.extend(nodes);
    }

    fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_nodes_are_none() {
        let store = MemoryNodeStore::<u64>::new();
        assert_eq!(store.get_node(NodeIndex::leaf(0)), None);
        assert_eq!(store.num_nodes(), 0);
    }

    #[test]
    fn set_nodes_overwrites() {
        let mut store = MemoryNodeStore::new();
        store.set_nodes([(NodeIndex::leaf(0), 1u64), (NodeIndex::new(1, 0), 2)]);
        store.set_nodes([(NodeIndex::leaf(0), 3u64)]);

        assert_eq!(store.get_node(NodeIndex::leaf(0)), Some(3));
        assert_eq!(store.get_node(NodeIndex::new(1, 0)), Some(2));
        assert_eq!(store.num_nodes(), 2);
    }

    #[test]
    fn keys_do_not_collide_across_levels() {
        // (1, 11) and (11, 1) would both render as "111" if keys were concatenated strings
        let mut store = MemoryNodeStore::new();
        store.set_nodes([(NodeIndex::new(1, 11), 1u64), (NodeIndex::new(11, 1), 2)]);

        assert_eq!(store.get_node(NodeIndex::new(1, 11)), Some(1));
        assert_eq!(store.get_node(NodeIndex::new(11, 1)), Some(2));
    }
}
