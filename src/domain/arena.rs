use generational_arena::{Arena, Index};
use itertools::Itertools;
use std::fmt;
use tracing::instrument;

/// Identifier of a node as given by the input descriptors.
pub type NodeId = u64;

/// Data payload for tree nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Unique identifier, stable across build, prune and layout
    pub id: NodeId,
    /// Display text; may be blank
    pub label: String,
    /// Fill tag handed to the renderer as-is
    pub color: String,
}

impl NodeData {
    pub fn new(id: NodeId, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            color: color.into(),
        }
    }

    /// A label that is empty after trimming surrounding whitespace.
    pub fn is_blank(&self) -> bool {
        self.label.trim().is_empty()
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            write!(f, "{}: <blank>", self.id)
        } else {
            write!(f, "{}: {}", self.id, self.label.split_whitespace().join(" "))
        }
    }
}

/// Layout coordinate: rows grow upwards, the root sits on the highest row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub row: f64,
    pub column: f64,
}

/// Horizontal interval assigned to a subtree by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub left: f64,
    pub right: f64,
}

impl Span {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    pub fn midpoint(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Splits into the left and right half.
    pub fn halves(&self) -> (Span, Span) {
        let mid = self.left + self.width() / 2.0;
        (Span::new(self.left, mid), Span::new(mid, self.right))
    }

    /// True if the open intervals intersect; touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.left < other.right && other.left < self.right
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.left <= other.left && other.right <= self.right
    }
}

/// Opaque token issued by a renderer for a drawn shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub usize);

/// Child slot of a binary node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Binary tree node in the arena.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    pub left: Option<Index>,
    pub right: Option<Index>,
    /// Set by the layout engine
    pub position: Option<Position>,
    /// Interval the layout engine assigned to this subtree
    pub span: Option<Span>,
    /// Cached renderer token, used to connect edges
    pub render_handle: Option<RenderHandle>,
}

impl TreeNode {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            left: None,
            right: None,
            position: None,
            span: None,
            render_handle: None,
        }
    }

    pub fn child(&self, side: Side) -> Option<Index> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn child_mut(&mut self, side: Side) -> &mut Option<Index> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Children in left-to-right order.
    pub fn children(&self) -> impl Iterator<Item = Index> {
        self.left.into_iter().chain(self.right)
    }
}

/// Arena-based binary tree.
///
/// The arena owns every node; ownership flows from the root down through the
/// `left`/`right` slots, and `parent` is a plain index that never keeps a node
/// alive. Only nodes reachable from the root are kept in the arena.
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_node(&mut self, data: NodeData) -> Index {
        self.arena.insert(TreeNode::new(data))
    }

    /// Puts `child` into the `side` slot of `parent` and sets the back-link.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn attach(&mut self, parent: Index, side: Side, child: Index) {
        if let Some(node) = self.arena.get_mut(parent) {
            *node.child_mut(side) = Some(child);
        }
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    /// Overwrites the `side` slot of `parent`, which may clear it.
    pub(crate) fn set_child(&mut self, parent: Index, side: Side, child: Option<Index>) {
        if let Some(node) = self.arena.get_mut(parent) {
            *node.child_mut(side) = child;
        }
    }

    pub(crate) fn set_parent(&mut self, node: Index, parent: Option<Index>) {
        if let Some(node) = self.arena.get_mut(node) {
            node.parent = parent;
        }
    }

    pub(crate) fn set_root(&mut self, root: Option<Index>) {
        self.root = root;
    }

    pub(crate) fn remove_node(&mut self, idx: Index) -> Option<TreeNode> {
        self.arena.remove(idx)
    }

    /// Every index in the arena, reachable or not.
    pub(crate) fn iter_all(&self) -> impl Iterator<Item = Index> + '_ {
        self.arena.iter().map(|(idx, _)| idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes held by the tree.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Looks up a node by its descriptor id.
    pub fn find(&self, id: NodeId) -> Option<Index> {
        self.iter().find(|(_, node)| node.data.id == id).map(|(idx, _)| idx)
    }

    pub fn id_of(&self, idx: Index) -> Option<NodeId> {
        self.get_node(idx).map(|node| node.data.id)
    }

    /// The slot of its parent that holds `idx`, None for the root.
    pub fn side_of(&self, idx: Index) -> Option<Side> {
        let parent = self.get_node(self.get_node(idx)?.parent?)?;
        if parent.left == Some(idx) {
            Some(Side::Left)
        } else if parent.right == Some(idx) {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Pre-order traversal (node, left subtree, right subtree).
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.root)
    }

    /// Post-order traversal of the whole tree.
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, self.root)
    }

    /// Post-order traversal of the subtree rooted at `start`.
    pub fn iter_postorder_from(&self, start: Index) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, Some(start))
    }

    /// In-order traversal (left subtree, node, right subtree).
    pub fn iter_inorder(&self) -> InOrderIterator<'_> {
        InOrderIterator::new(self)
    }

    /// Number of levels; 0 for the empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children()
                .map(|child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena, start: Option<Index>) -> Self {
        Self {
            arena,
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Right first so the left subtree is popped first
                self.stack.extend(node.right);
                self.stack.extend(node.left);
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena, start: Option<Index>) -> Self {
        Self {
            arena,
            stack: start.map(|idx| (idx, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    self.stack.extend(node.right.map(|idx| (idx, false)));
                    self.stack.extend(node.left.map(|idx| (idx, false)));
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

pub struct InOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
    current: Option<Index>,
}

impl<'a> InOrderIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        Self {
            arena,
            stack: Vec::new(),
            current: arena.root(),
        }
    }
}

impl<'a> Iterator for InOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(idx) = self.current {
            self.stack.push(idx);
            self.current = self.arena.get_node(idx).and_then(|node| node.left);
        }
        let idx = self.stack.pop()?;
        let node = self.arena.get_node(idx)?;
        self.current = node.right;
        Some((idx, node))
    }
}
