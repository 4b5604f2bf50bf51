//! Composite/leaf classification.

use std::collections::HashSet;

use crate::domain::module::ModuleLike;

/// Type names treated as containers when nothing else is configured.
pub const DEFAULT_COMPOSITE_TYPES: [&str; 2] = ["Sequential", "BasicBlock"];

/// Decides whether a module is walked into (composite) or snapshotted (leaf).
pub trait Classifier {
    fn is_composite(&self, module: &dyn ModuleLike) -> bool;
}

/// Classifies by runtime type name against a configured set.
///
/// Unknown type names are leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNameClassifier {
    composite_types: HashSet<String>,
}

impl Default for TypeNameClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_COMPOSITE_TYPES)
    }
}

impl TypeNameClassifier {
    pub fn new<I, S>(composite_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            composite_types: composite_types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.composite_types.contains(type_name)
    }
}

impl Classifier for TypeNameClassifier {
    fn is_composite(&self, module: &dyn ModuleLike) -> bool {
        self.contains(module.type_name())
    }
}

impl<F> Classifier for F
where
    F: Fn(&dyn ModuleLike) -> bool,
{
    fn is_composite(&self, module: &dyn ModuleLike) -> bool {
        self(module)
    }
}
