//! Same-depth neighbor lookup without a level-order index.

use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::TreeArena;

impl TreeArena {
    /// The node immediately right of `node` at the same depth.
    ///
    /// Climbs until an ancestor (or `node` itself) is a left child, then
    /// descends from that parent's right child along `left` links as many
    /// steps as were climbed. A left child therefore resolves to its parent's
    /// right child with zero hops. Returns None for the root, for the right
    /// edge of the tree, and wherever the descent runs into a missing child.
    #[instrument(level = "trace", skip(self))]
    pub fn next_sibling(&self, node: Index) -> Option<Index> {
        let mut current = node;
        let mut hops = 0usize;
        let anchor = loop {
            let parent = self.get_node(current)?.parent?;
            if self.get_node(parent)?.left == Some(current) {
                break parent;
            }
            current = parent;
            hops += 1;
        };

        let mut target = self.get_node(anchor)?.right;
        for _ in 0..hops {
            target = self.get_node(target?)?.left;
        }
        target
    }

    /// Walks right along the level of `start`, beginning with `start`.
    pub fn level_from(&self, start: Index) -> LevelWalk<'_> {
        LevelWalk {
            arena: self,
            next: Some(start),
        }
    }
}

/// Iterator produced by [`TreeArena::level_from`].
pub struct LevelWalk<'a> {
    arena: &'a TreeArena,
    next: Option<Index>,
}

impl Iterator for LevelWalk<'_> {
    type Item = Index;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.arena.next_sibling(current);
        Some(current)
    }
}
