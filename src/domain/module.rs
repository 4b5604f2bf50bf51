//! The module-like capability the tree builder walks.

use serde_json::Value;

use crate::domain::error::IntrospectionError;
use crate::domain::tensor::Tensor;

/// Raw value of a public attribute, captured by value at extraction time.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Absent value (`None`).
    None,
    /// Generic type-variable marker carried by a layer type; holds the variable name.
    Placeholder(String),
    Tensor(Tensor),
    /// Plain hyperparameter or already JSON-compatible structure.
    Json(Value),
    /// Object with no JSON representation.
    Opaque { type_name: String },
}

impl AttrValue {
    pub fn opaque(type_name: impl Into<String>) -> Self {
        AttrValue::Opaque {
            type_name: type_name.into(),
        }
    }

    /// Short kind name for logs and error messages.
    pub fn kind(&self) -> &str {
        match self {
            AttrValue::None => "None",
            AttrValue::Placeholder(_) => "TypeVar",
            AttrValue::Tensor(_) => "Tensor",
            AttrValue::Json(_) => "json",
            AttrValue::Opaque { type_name } => type_name.as_str(),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Json(Value::Bool(v))
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Json(Value::from(v))
    }
}

impl From<usize> for AttrValue {
    fn from(v: usize) -> Self {
        AttrValue::Json(Value::from(v))
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Json(Value::from(v))
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Json(Value::from(v))
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Json(Value::from(v))
    }
}

/// Tuples such as `kernel_size` are carried as JSON arrays.
impl From<(usize, usize)> for AttrValue {
    fn from((a, b): (usize, usize)) -> Self {
        AttrValue::Json(Value::from(vec![a, b]))
    }
}

impl From<Value> for AttrValue {
    fn from(v: Value) -> Self {
        AttrValue::Json(v)
    }
}

impl From<Tensor> for AttrValue {
    fn from(v: Tensor) -> Self {
        AttrValue::Tensor(v)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(AttrValue::None)
    }
}

/// One introspected member of a module.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Value(AttrValue),
    /// Bound method or function: behavior, not state.
    Callable,
}

impl Member {
    pub fn value(v: impl Into<AttrValue>) -> Self {
        Member::Value(v.into())
    }
}

/// Named child module as returned by [`ModuleLike::named_children`].
pub type NamedChild<'a> = (String, &'a dyn ModuleLike);

/// Minimal capability a model object must provide to be turned into a tree.
///
/// Implementations must describe an acyclic, finite hierarchy.
pub trait ModuleLike {
    /// Runtime type name, e.g. `Conv2d`. Must not be empty.
    fn type_name(&self) -> &str;

    /// Direct sub-modules in registration order.
    fn named_children(&self) -> Result<Vec<NamedChild<'_>>, IntrospectionError>;

    /// Every member reachable by introspection, including private and callable ones.
    fn members(&self) -> Vec<(String, Member)>;
}
