//! Domain layer: model trees and their serialized forms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod classifier;
pub mod coerce;
pub mod error;
pub mod extractor;
pub mod module;
pub mod node;
pub mod serialize;
pub mod tensor;

pub use builder::{TreeBuilder, DEFAULT_MAX_DEPTH};
pub use classifier::{Classifier, TypeNameClassifier, DEFAULT_COMPOSITE_TYPES};
pub use coerce::{tensor_to_json, CoercionPolicy, ValueCoercer};
pub use error::{IntrospectionError, TreeError, TreeResult};
pub use extractor::{AttributeExtractor, DEFAULT_PRIVATE_PREFIX};
pub use module::{AttrValue, Member, ModuleLike, NamedChild};
pub use node::{Node, NodeData, NodeKind, ROOT_NAME};
pub use serialize::{to_text, Serializer, TreeView};
pub use tensor::Tensor;
