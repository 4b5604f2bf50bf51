//! JSON, level-summary and tree renderings of a `Node` tree.

use itertools::Itertools;
use serde_json::{Map, Value};
use termtree::Tree;
use tracing::instrument;

use crate::domain::coerce::ValueCoercer;
use crate::domain::error::TreeResult;
use crate::domain::node::Node;

/// Renders trees to JSON, coercing leaf attributes on the way.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serializer {
    coercer: ValueCoercer,
}

impl Serializer {
    pub fn new(coercer: ValueCoercer) -> Self {
        Self { coercer }
    }

    /// `{ name: { "data": {..}, "children": [..] } }`, recursively.
    ///
    /// Both fields are always present. The first attribute that cannot be
    /// coerced aborts the whole rendering.
    #[instrument(level = "debug", skip_all, fields(root = %node.name))]
    pub fn to_json(&self, node: &Node) -> TreeResult<Value> {
        self.node_to_json(node)
    }

    fn node_to_json(&self, node: &Node) -> TreeResult<Value> {
        let data = node
            .data
            .iter()
            .map(|(key, value)| {
                self.coercer
                    .coerce(&node.name, key, value)
                    .map(|v| (key.clone(), v))
            })
            .collect::<TreeResult<Map<String, Value>>>()?;

        let children = node
            .children
            .iter()
            .map(|child| self.node_to_json(child))
            .collect::<TreeResult<Vec<Value>>>()?;

        let mut body = Map::new();
        body.insert("data".to_string(), Value::Object(data));
        body.insert("children".to_string(), Value::Array(children));

        let mut wrapper = Map::new();
        wrapper.insert(node.name.clone(), Value::Object(body));
        Ok(Value::Object(wrapper))
    }
}

/// Breadth-first summary: the node name, then one line per deeper level with
/// the space-joined names of all nodes on that level.
///
/// Parent grouping is not marked within a line.
pub fn to_text(node: &Node) -> String {
    node.levels()
        .iter()
        .map(|level| level.iter().map(|n| n.name.as_str()).join(" ") + "\n")
        .collect()
}

/// Conversion into a box-drawing tree for terminal display.
pub trait TreeView {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeView for Node {
    fn to_tree_string(&self) -> Tree<String> {
        let label = if self.data.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({} attrs)", self.name, self.data.len())
        };

        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();

        Tree::new(label).with_leaves(leaves)
    }
}
