//! Terminal rendering of arena trees via `termtree`.

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::{Side, TreeArena};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for TreeArena {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        let Some(root_idx) = self.root() else {
            return Tree::new("Empty tree".to_string());
        };
        let Some(root) = self.get_node(root_idx) else {
            return Tree::new("Empty tree".to_string());
        };
        let mut tree = Tree::new(root.data.to_string());

        fn build_tree(arena: &TreeArena, node_idx: Index, parent_tree: &mut Tree<String>) {
            let Some(node) = arena.get_node(node_idx) else {
                return;
            };
            for side in [Side::Left, Side::Right] {
                let Some(child_idx) = node.child(side) else {
                    continue;
                };
                if let Some(child) = arena.get_node(child_idx) {
                    let tag = match side {
                        Side::Left => "L",
                        Side::Right => "R",
                    };
                    let mut child_tree = Tree::new(format!("{} {}", tag, child.data));
                    build_tree(arena, child_idx, &mut child_tree);
                    parent_tree.push(child_tree);
                }
            }
        }

        build_tree(self, root_idx, &mut tree);
        tree
    }
}
