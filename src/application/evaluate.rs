//! Evaluate tag use case

use crate::domain::tags::{
    Attribute, AttributeChain, DiagnosticKind, TagContext, TagDiagnostic,
};
use crate::domain::{TagObject, Value};
use crate::error::Result;

/// Result of evaluating one tag
#[derive(Debug, Clone, PartialEq)]
pub struct TagOutcome {
    /// `None` when the tag failed or the flag is absent
    pub value: Option<Value>,
    /// Failures recorded during evaluation
    pub diagnostics: Vec<TagDiagnostic>,
}

impl TagOutcome {
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }
}

/// Service for evaluating tags against flaggable objects
#[derive(Debug, Clone)]
pub struct EvaluateTagService {
    context: TagContext,
}

impl EvaluateTagService {
    /// Create a new evaluate service
    pub fn new(context: TagContext) -> Self {
        EvaluateTagService { context }
    }

    pub fn context(&self) -> &TagContext {
        &self.context
    }

    /// Parse `tag` and evaluate it against `object`
    ///
    /// Only a malformed tag is an `Err`. Every other failure is a `None`
    /// value with diagnostics.
    pub fn execute<T: TagObject>(&self, object: &T, tag: &str) -> Result<TagOutcome> {
        let chain = AttributeChain::parse(tag)?;
        Ok(self.evaluate(object, &chain))
    }

    /// Evaluate an already parsed chain against `object`
    pub fn evaluate<T: TagObject>(&self, object: &T, chain: &AttributeChain) -> TagOutcome {
        let mut attribute = Attribute::new(chain, &self.context);
        let mut value = T::tag_processor().process(object, &mut attribute);

        if value.is_some() && !attribute.is_complete() {
            let leftover: Vec<String> = attribute
                .remaining()
                .iter()
                .map(|s| s.to_string())
                .collect();
            attribute.echo_error(
                DiagnosticKind::UnfilledAttributes,
                format!(
                    "Tag '{}' has unfilled attributes: {}",
                    chain.raw(),
                    leftover.join(".")
                ),
            );
            value = None;
        }

        TagOutcome {
            value,
            diagnostics: attribute.into_diagnostics(),
        }
    }
}
