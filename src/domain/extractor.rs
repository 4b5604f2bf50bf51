//! Leaf attribute extraction.

use tracing::{trace, warn};

use crate::domain::module::{Member, ModuleLike};
use crate::domain::node::NodeData;

pub const DEFAULT_PRIVATE_PREFIX: &str = "_";

/// Collects the public state of a leaf module.
///
/// A member is kept when its identifier does not start with the private
/// prefix and it is not callable. Values are cloned, so later changes to the
/// module do not reach the extracted map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeExtractor {
    private_prefix: String,
}

impl Default for AttributeExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_PRIVATE_PREFIX)
    }
}

impl AttributeExtractor {
    pub fn new(private_prefix: impl Into<String>) -> Self {
        Self {
            private_prefix: private_prefix.into(),
        }
    }

    pub fn is_private(&self, identifier: &str) -> bool {
        !self.private_prefix.is_empty() && identifier.starts_with(&self.private_prefix)
    }

    /// Snapshot the public members of `module`.
    ///
    /// When `members()` repeats an identifier the last value wins.
    pub fn extract(&self, module: &dyn ModuleLike) -> NodeData {
        let mut data = NodeData::new();
        for (identifier, member) in module.members() {
            let value = match member {
                _ if self.is_private(&identifier) => continue,
                Member::Callable => continue,
                Member::Value(value) => value,
            };
            trace!(%identifier, kind = value.kind(), "extracted attribute");
            if data.insert(identifier.clone(), value).is_some() {
                warn!(
                    type_name = module.type_name(),
                    %identifier,
                    "duplicate attribute, keeping last value"
                );
            }
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::module::AttrValue;
    use crate::util::testing::StubModule;

    #[test]
    fn given_repeated_identifier_when_extracting_then_last_value_wins() {
        let module = StubModule::new("Linear")
            .attr("bias", true)
            .attr("in_features", 4usize)
            .attr("bias", false);

        let data = AttributeExtractor::default().extract(&module);

        assert_eq!(data.len(), 2);
        assert_eq!(data["bias"], AttrValue::from(false));
    }
}
