use core::fmt::Display;

use crate::utils::{ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable};

// NODE INDEX
// ================================================================================================

/// Address of a node in a fixed-depth binary tree.
///
/// Levels are counted from the bottom: leaves live at level `0`, and the root of a tree of depth
/// `d` lives at level `d`, position `0`. A level `l` contains positions in `[0, 2^(d - l))`.
///
/// The index is used as the key of the sparse node store, so it derives both [Ord] and [Hash]
/// and can back either map flavour.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct NodeIndex {
    level: u8,
    position: u64,
}

impl NodeIndex {
    // CONSTRUCTORS
    // --------------------------------------------------------------------------------------------

    /// Creates a new node index.
    pub const fn new(level: u8, position: u64) -> Self {
        Self { level, position }
    }

    /// Creates the index of the leaf at `position`.
    pub const fn leaf(position: u64) -> Self {
        Self::new(0, position)
    }

    /// Creates the index of the root of a tree with the given depth.
    pub const fn root(depth: u8) -> Self {
        Self::new(depth, 0)
    }

    // PUBLIC ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns the level of this node, counted from the leaves.
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Returns the position of this node within its level.
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// Returns true if this node is a leaf.
    pub const fn is_leaf(&self) -> bool {
        self.level == 0
    }

    /// Returns true if this node is the right child of its parent.
    pub const fn is_right(&self) -> bool {
        self.position & 1 == 1
    }

    /// Returns the index of the other child of this node's parent.
    pub const fn sibling(mut self) -> Self {
        self.position ^= 1;
        self
    }

    /// Returns the index of this node's parent.
    ///
    /// # Panics
    /// Panics if this node is at level `u8::MAX`, which has no parent.
    pub const fn parent(self) -> Self {
        assert!(self.level < u8::MAX, "node at the maximum level has no parent");
        Self::new(self.level + 1, self.position >> 1)
    }

    /// Arranges this node and its sibling as `[left, right]` children of the parent node.
    pub const fn build_node<D: Copy>(&self, node: D, sibling: D) -> [D; 2] {
        if self.is_right() { [sibling, node] } else { [node, sibling] }
    }
}

impl Display for NodeIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "level={}, position={}", self.level, self.position)
    }
}

// SERIALIZATION
// ================================================================================================

impl Serializable for NodeIndex {
    fn write_into<W: ByteWriter>(&self, target: &mut W) {
        target.write_u8(self.level);
        target.write_u64(self.position);
    }
}

impl Deserializable for NodeIndex {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let level = source.read_u8()?;
        let position = source.read_u64()?;
        Ok(Self::new(level, position))
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 1)]
    #[case(1, 0)]
    #[case(6, 7)]
    #[case(7, 6)]
    fn sibling_flips_lowest_bit(#[case] position: u64, #[case] expected: u64) {
        let index = NodeIndex::new(3, position);
        assert_eq!(index.sibling(), NodeIndex::new(3, expected));
        assert_eq!(index.sibling().sibling(), index);
    }

    #[test]
    fn parent_halves_position() {
        assert_eq!(NodeIndex::leaf(5).parent(), NodeIndex::new(1, 2));
        assert_eq!(NodeIndex::leaf(4).parent(), NodeIndex::new(1, 2));
        assert_eq!(NodeIndex::new(1, 1).parent(), NodeIndex::root(2));
    }

    #[test]
    #[should_panic(expected = "node at the maximum level has no parent")]
    fn parent_of_top_level_panics() {
        let _ = NodeIndex::new(u8::MAX, 0).parent();
    }

    #[test]
    fn build_node_orders_children() {
        assert_eq!(NodeIndex::leaf(2).build_node(10, 20), [10, 20]);
        assert_eq!(NodeIndex::leaf(3).build_node(10, 20), [20, 10]);
    }

    #[test]
    fn index_serialization() {
        let index = NodeIndex::new(17, 123_456);
        let bytes = index.to_bytes();
        assert_eq!(bytes.len(), 9);
        assert_eq!(NodeIndex::read_from_bytes(&bytes).unwrap(), index);
    }
}
