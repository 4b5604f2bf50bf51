//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Raised by a `ModuleLike` implementation that cannot enumerate its children.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{type_name}: {reason}")]
pub struct IntrospectionError {
    pub type_name: String,
    pub reason: String,
}

impl IntrospectionError {
    pub fn new(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}

/// Tree errors represent a source object violating the module-like contract,
/// or a leaf value that cannot be represented as JSON.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("child '{child}' of {parent} has no runtime type name")]
    UnnamedType { parent: String, child: String },

    #[error("cannot enumerate children of {0}")]
    Introspection(#[from] IntrospectionError),

    #[error("module nesting exceeds maximum depth {max_depth} at {type_name}")]
    DepthExceeded { type_name: String, max_depth: usize },

    #[error("cannot coerce attribute '{attribute}' of {node}: unserializable value of type {type_name}")]
    Coercion {
        node: String,
        attribute: String,
        type_name: String,
    },
}

impl TreeError {
    /// True for errors caused by the source object not satisfying the module-like contract.
    pub fn is_precondition(&self) -> bool {
        !matches!(self, TreeError::Coercion { .. })
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
