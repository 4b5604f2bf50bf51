//! Model export service
//!
//! Builds the tree of a model and renders its JSON and text forms.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    to_text, AttributeExtractor, ModuleLike, Node, Serializer, TreeBuilder, TypeNameClassifier,
    ValueCoercer,
};

/// Everything produced for one model.
#[derive(Debug, Clone)]
pub struct ModelExport {
    pub tree: Node,
    pub json: Value,
    pub text: String,
}

/// Service turning module-like models into trees and documents.
pub struct ExportService {
    builder: TreeBuilder,
    serializer: Serializer,
    pretty: bool,
}

impl ExportService {
    /// Create a service configured from `settings`.
    pub fn new(settings: &Settings) -> Self {
        let classifier = TypeNameClassifier::new(settings.composite_types.iter().cloned());
        let builder = TreeBuilder::new(classifier)
            .with_extractor(AttributeExtractor::new(settings.private_prefix.clone()))
            .with_root_name(settings.root_name.clone())
            .with_max_depth(settings.max_depth);

        Self {
            builder,
            serializer: Serializer::new(ValueCoercer::new(settings.on_unserializable)),
            pretty: settings.pretty,
        }
    }

    /// Build the tree only.
    pub fn build(&self, model: &dyn ModuleLike) -> ApplicationResult<Node> {
        Ok(self.builder.build_tree(model)?)
    }

    /// Build the tree and render both serialized forms.
    #[instrument(level = "debug", skip_all, fields(model = model.type_name()))]
    pub fn export(&self, model: &dyn ModuleLike) -> ApplicationResult<ModelExport> {
        let tree = self.build(model)?;
        let json = self.serializer.to_json(&tree)?;
        let text = to_text(&tree);
        debug!(
            nodes = tree.node_count(),
            leaves = tree.leaf_count(),
            "export: rendered"
        );
        Ok(ModelExport { tree, json, text })
    }

    /// JSON document as a string, pretty-printed unless configured otherwise.
    pub fn render_json(&self, json: &Value) -> ApplicationResult<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(json)
        } else {
            serde_json::to_string(json)
        };
        rendered.map_err(|source| ApplicationError::Serialize {
            context: "render model json".to_string(),
            source,
        })
    }

    pub fn set_pretty(&mut self, pretty: bool) {
        self.pretty = pretty;
    }
}
