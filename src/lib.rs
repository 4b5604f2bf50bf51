//! Structural snapshots of neural-network models.
//!
//! A model implementing [`domain::ModuleLike`] is walked into a [`domain::Node`]
//! tree: configured container types become composite nodes, everything else a
//! leaf carrying its public attributes. The tree renders to JSON
//! (`{"<type>": {"data": {..}, "children": [..]}}`), to a level-by-level text
//! summary and to a box-drawing tree.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
pub mod zoo;

pub use application::{ApplicationError, ExportService, ModelExport};
pub use config::Settings;
pub use domain::{
    AttrValue, Classifier, Member, ModuleLike, Node, Serializer, Tensor, TreeBuilder, TreeError,
    TypeNameClassifier, ValueCoercer,
};
