//! Tree builder walking module-like objects into `Node` trees.

use tracing::{debug, instrument, warn};

use crate::domain::classifier::{Classifier, TypeNameClassifier};
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::extractor::AttributeExtractor;
use crate::domain::module::ModuleLike;
use crate::domain::node::{Node, ROOT_NAME};

/// Nesting limit applied when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Constructs a `Node` tree from a model hierarchy.
///
/// Each child is classified once: composites get an empty node and are
/// walked recursively, leaves get their public attributes and are not
/// descended into.
pub struct TreeBuilder<C = TypeNameClassifier> {
    classifier: C,
    extractor: AttributeExtractor,
    root_name: String,
    max_depth: usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(TypeNameClassifier::default())
    }
}

impl<C: Classifier> TreeBuilder<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            extractor: AttributeExtractor::default(),
            root_name: ROOT_NAME.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_extractor(mut self, extractor: AttributeExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_root_name(mut self, root_name: impl Into<String>) -> Self {
        self.root_name = root_name.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Build the whole tree under a fresh root node.
    #[instrument(level = "debug", skip_all, fields(model = model.type_name()))]
    pub fn build_tree(&self, model: &dyn ModuleLike) -> TreeResult<Node> {
        let mut root = Node::root_named(self.root_name.clone());
        self.build(model, &mut root)?;
        debug!(
            nodes = root.node_count(),
            depth = root.depth(),
            "tree built"
        );
        Ok(root)
    }

    /// Attach the children of `module` to `parent`, in enumeration order.
    pub fn build(&self, module: &dyn ModuleLike, parent: &mut Node) -> TreeResult<()> {
        self.build_level(module, parent, 1)
    }

    fn build_level(
        &self,
        module: &dyn ModuleLike,
        parent: &mut Node,
        depth: usize,
    ) -> TreeResult<()> {
        if depth > self.max_depth {
            return Err(TreeError::DepthExceeded {
                type_name: module.type_name().to_string(),
                max_depth: self.max_depth,
            });
        }

        for (child_name, child) in module.named_children()? {
            let type_name = child.type_name();
            if type_name.is_empty() {
                return Err(TreeError::UnnamedType {
                    parent: parent.name.clone(),
                    child: child_name,
                });
            }

            let node = if self.classifier.is_composite(child) {
                let mut node = Node::composite(type_name);
                self.build_level(child, &mut node, depth + 1)?;
                node
            } else {
                self.warn_if_container(&child_name, child);
                Node::leaf(type_name, self.extractor.extract(child))
            };
            parent.add_child(node);
        }
        Ok(())
    }

    /// Leaves are never descended into, so a leaf with sub-modules gets flattened.
    fn warn_if_container(&self, child_name: &str, child: &dyn ModuleLike) {
        match child.named_children() {
            Ok(grandchildren) if !grandchildren.is_empty() => warn!(
                child = child_name,
                type_name = child.type_name(),
                sub_modules = grandchildren.len(),
                "unrecognized container type classified as leaf"
            ),
            _ => {}
        }
    }
}
