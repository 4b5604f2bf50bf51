use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use crate::domain::module::AttrValue;

/// Name given to the synthetic root of every tree.
pub const ROOT_NAME: &str = "root";

/// Attribute map of a leaf node, keyed by identifier.
pub type NodeData = BTreeMap<String, AttrValue>;

/// Classification fixed when a node is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Composite,
    Leaf,
}

/// Node of a model tree.
///
/// A node is either a leaf (attributes, no children) or a composite/root
/// (children, no attributes). Children are owned and kept in the order the
/// source module enumerated them.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub data: NodeData,
    pub children: Vec<Node>,
    kind: NodeKind,
}

impl Node {
    pub fn root() -> Self {
        Self::root_named(ROOT_NAME)
    }

    pub fn root_named(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeData::new(), NodeKind::Root)
    }

    pub fn composite(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeData::new(), NodeKind::Composite)
    }

    pub fn leaf(name: impl Into<String>, data: NodeData) -> Self {
        Self::with_kind(name, data, NodeKind::Leaf)
    }

    fn with_kind(name: impl Into<String>, data: NodeData, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            data,
            children: Vec::new(),
            kind,
        }
    }

    /// Append a child; children are never removed or reordered.
    pub fn add_child(&mut self, child: Node) {
        debug_assert!(
            self.kind != NodeKind::Leaf,
            "leaf '{}' cannot take children",
            self.name
        );
        self.children.push(child);
    }

    pub fn get_children(&self) -> &[Node] {
        &self.children
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// True for modules snapshotted as leaves, even those with no attributes.
    /// Empty containers are not leaves.
    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }

    pub fn is_root(&self) -> bool {
        self.kind == NodeKind::Root
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut queue = VecDeque::new();
        queue.push_back((self, 1)); // (node, depth)

        while let Some((node, depth)) = queue.pop_front() {
            max_depth = max_depth.max(depth);
            for child in &node.children {
                queue.push_back((child, depth + 1));
            }
        }

        max_depth
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    pub fn leaf_count(&self) -> usize {
        match self.kind {
            NodeKind::Leaf => 1,
            _ => self.children.iter().map(Node::leaf_count).sum(),
        }
    }

    /// Leaves in breadth-first order.
    pub fn leaf_nodes(&self) -> Vec<&Node> {
        let mut leaves = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(self);

        while let Some(node) = queue.pop_front() {
            if node.is_leaf() {
                leaves.push(node);
            } else {
                queue.extend(node.children.iter());
            }
        }

        leaves
    }

    /// Nodes grouped by level, starting with `[self]`.
    ///
    /// Each level holds the children of every node of the previous level,
    /// parents left to right.
    pub fn levels(&self) -> Vec<Vec<&Node>> {
        let mut levels = Vec::new();
        let mut current = vec![self];

        while !current.is_empty() {
            let next: Vec<&Node> = current
                .iter()
                .flat_map(|&node| node.children.iter())
                .collect();
            levels.push(current);
            current = next;
        }

        levels
    }
}

/// Renders the breadth-first level summary.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::domain::serialize::to_text(self))
    }
}
