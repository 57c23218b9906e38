use std::collections::VecDeque;

use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::{NodeId, TreeArena};

impl TreeArena {
    /// Breadth-first partition of the tree into levels, root level first.
    ///
    /// Within a level nodes appear in discovery order, left child before
    /// right child. The empty tree has no levels.
    #[instrument(level = "debug", skip(self))]
    pub fn levels(&self) -> Vec<Vec<Index>> {
        let mut levels: Vec<Vec<Index>> = Vec::new();
        let mut queue = VecDeque::new();
        queue.extend(self.root().map(|root| (root, 0usize)));

        while let Some((idx, depth)) = queue.pop_front() {
            let Some(node) = self.get_node(idx) else {
                continue;
            };
            if levels.len() <= depth {
                levels.push(Vec::new());
            }
            levels[depth].push(idx);
            queue.extend(node.children().map(|child| (child, depth + 1)));
        }

        levels
    }

    /// Same as [`TreeArena::levels`], with node ids instead of indices.
    pub fn level_ids(&self) -> Vec<Vec<NodeId>> {
        self.levels()
            .into_iter()
            .map(|level| level.into_iter().filter_map(|idx| self.id_of(idx)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::arena::TreeArena;
    use crate::domain::builder::{build, EdgeTriple, NodeDescriptor};

    #[test]
    fn test_levels_follow_discovery_order() {
        let nodes: Vec<NodeDescriptor> = [0, 1, 2, 3, 4, 5]
            .into_iter()
            .map(|id| NodeDescriptor::new(id, "x", "white"))
            .collect();
        let edges = [
            EdgeTriple::from((0, 1, 2)),
            EdgeTriple::new(1, None, Some(3)),
            EdgeTriple::new(2, Some(4), Some(5)),
        ];
        let tree = build(&nodes, &edges).unwrap();
        assert_eq!(tree.level_ids(), vec![vec![0], vec![1, 2], vec![3, 4, 5]]);
        assert_eq!(tree.levels().len(), tree.depth());
    }

    #[test]
    fn test_levels_of_empty_tree() {
        assert!(TreeArena::new().levels().is_empty());
    }
}
