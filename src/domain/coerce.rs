//! Conversion of raw attribute values into JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::module::AttrValue;
use crate::domain::tensor::Tensor;

/// What to do with a value that has no JSON form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionPolicy {
    /// Abort the serialization.
    #[default]
    Fail,
    /// Emit an empty string and log a warning.
    Substitute,
}

/// Maps attribute values to JSON-safe values.
///
/// Cases, in priority order: absent and placeholder values become `""`,
/// tensors become nested arrays shaped like the tensor, JSON values pass
/// through unchanged, opaque values are handled per [`CoercionPolicy`].
/// A tensor whose buffer does not fill its shape is always an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueCoercer {
    policy: CoercionPolicy,
}

impl ValueCoercer {
    pub fn new(policy: CoercionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> CoercionPolicy {
        self.policy
    }

    /// Coerce `value`, the attribute `attribute` of node `node`.
    pub fn coerce(&self, node: &str, attribute: &str, value: &AttrValue) -> TreeResult<Value> {
        match value {
            AttrValue::None | AttrValue::Placeholder(_) => Ok(Value::String(String::new())),
            AttrValue::Tensor(tensor) => {
                tensor_to_json(tensor).ok_or_else(|| TreeError::Coercion {
                    node: node.to_string(),
                    attribute: attribute.to_string(),
                    type_name: format!(
                        "Tensor{:?} holding {} elements",
                        tensor.shape(),
                        tensor.numel()
                    ),
                })
            }
            AttrValue::Json(v) => Ok(v.clone()),
            AttrValue::Opaque { type_name } => match self.policy {
                CoercionPolicy::Fail => Err(TreeError::Coercion {
                    node: node.to_string(),
                    attribute: attribute.to_string(),
                    type_name: type_name.clone(),
                }),
                CoercionPolicy::Substitute => {
                    warn!(node, attribute, %type_name, "substituting unserializable attribute");
                    Ok(Value::String(String::new()))
                }
            },
        }
    }
}

/// Nested row-major array of the tensor elements; a 0-d tensor is a bare number.
///
/// `None` when the element count does not match the shape.
pub fn tensor_to_json(tensor: &Tensor) -> Option<Value> {
    nest(tensor.data(), tensor.shape())
}

fn nest(data: &[f32], shape: &[usize]) -> Option<Value> {
    if data.len() != shape.iter().product::<usize>() {
        return None;
    }
    match shape.split_first() {
        None => data.first().map(|&x| number(x)),
        Some((&len, rest)) => {
            let stride: usize = rest.iter().product();
            (0..len)
                .map(|i| nest(&data[i * stride..(i + 1) * stride], rest))
                .collect::<Option<Vec<_>>>()
                .map(Value::Array)
        }
    }
}

/// Non-finite values have no JSON number form and become `null`.
fn number(x: f32) -> Value {
    serde_json::Number::from_f64(f64::from(x)).map_or(Value::Null, Value::Number)
}
