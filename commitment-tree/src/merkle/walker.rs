use core::iter::FusedIterator;

use super::NodeIndex;

// PATH STEP
// ================================================================================================

/// A single step on the way from a leaf to the root.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PathStep {
    /// The node on the path at this level.
    pub node: NodeIndex,
    /// The other child of `node`'s parent.
    pub sibling: NodeIndex,
}

impl PathStep {
    /// Returns the level of this step.
    pub const fn level(&self) -> u8 {
        self.node.level()
    }

    /// Returns 0 when the path node is a left child and 1 when it is a right child.
    pub const fn direction(&self) -> u8 {
        (self.node.position() & 1) as u8
    }
}

// PATH WALKER
// ================================================================================================

/// Iterates over the nodes on the path from a leaf up to, but excluding, the root.
///
/// For a tree of depth `d` the walker yields exactly `d` steps, one per level `0..d`. At each
/// level the sibling position is the path position with its lowest bit flipped, and the path
/// position of the next level is the current one halved.
///
/// Both inclusion proofs and root recomputation are driven by this walk.
#[derive(Debug, Clone)]
pub struct PathWalker {
    current: NodeIndex,
    depth: u8,
}

impl PathWalker {
    /// Returns a walker starting at the leaf `position` of a tree with the given depth.
    pub const fn new(position: u64, depth: u8) -> Self {
        Self { current: NodeIndex::leaf(position), depth }
    }
}

impl Iterator for PathWalker {
    type Item = PathStep;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.level() >= self.depth {
            return None;
        }

        let step = PathStep { node: self.current, sibling: self.current.sibling() };
        self.current = self.current.parent();
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.depth.saturating_sub(self.current.level()) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PathWalker {}

impl FusedIterator for PathWalker {}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn walk(position: u64, depth: u8) -> Vec<(u8, u64, u64)> {
        PathWalker::new(position, depth)
            .map(|step| (step.level(), step.node.position(), step.sibling.position()))
            .collect()
    }

    #[test]
    fn walk_from_leftmost_leaf() {
        assert_eq!(walk(0, 3), vec![(0, 0, 1), (1, 0, 1), (2, 0, 1)]);
    }

    #[test]
    fn walk_from_inner_leaf() {
        // 5 = 0b101: right child, then left child, then right child
        assert_eq!(walk(5, 3), vec![(0, 5, 4), (1, 2, 3), (2, 1, 0)]);

        let directions: Vec<u8> = PathWalker::new(5, 3).map(|step| step.direction()).collect();
        assert_eq!(directions, vec![1, 0, 1]);
    }

    #[test]
    fn walk_length_matches_depth() {
        assert_eq!(PathWalker::new(0, 0).count(), 0);
        assert_eq!(PathWalker::new(3, 20).len(), 20);

        let mut walker = PathWalker::new(0, 2);
        walker.next();
        assert_eq!(walker.len(), 1);
        walker.next();
        assert_eq!(walker.next(), None);
        assert_eq!(walker.next(), None);
    }

    #[test]
    fn walk_full_depth_positions() {
        let steps = walk(u64::MAX, 64);
        assert_eq!(steps.len(), 64);
        assert_eq!(steps[0], (0, u64::MAX, u64::MAX - 1));
        assert_eq!(steps[63], (63, 1, 0));
    }
}
