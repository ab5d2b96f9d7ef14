//! Tag dispatch table
//!
//! Each object type owns one [`TagProcessor`], mapping a segment name to the
//! handler that answers it.

use crate::domain::tags::attribute::{Attribute, DiagnosticKind};
use crate::domain::value::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Handler for one tag name on objects of type `T`
pub type TagHandler<T> = Box<dyn Fn(&mut Attribute<'_>, &T) -> Option<Value> + Send + Sync>;

/// Documentation for a registered tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMeta {
    /// Segment name, e.g. `has_flag`
    pub name: &'static str,
    /// Usage form, e.g. `has_flag[<flag_name>]`
    pub syntax: &'static str,
    /// Type name of the result
    pub returns: &'static str,
    pub description: &'static str,
}

struct RegisteredTag<T> {
    meta: TagMeta,
    handler: TagHandler<T>,
}

/// Maps tag names to handlers for objects of type `T`
pub struct TagProcessor<T> {
    tags: BTreeMap<&'static str, RegisteredTag<T>>,
}

impl<T> fmt::Debug for TagProcessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagProcessor")
            .field("tags", &self.tags.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> Default for TagProcessor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TagProcessor<T> {
    pub fn new() -> Self {
        TagProcessor {
            tags: BTreeMap::new(),
        }
    }

    /// Register a handler. A later registration under the same name wins.
    pub fn register_tag<F>(&mut self, meta: TagMeta, handler: F)
    where
        F: Fn(&mut Attribute<'_>, &T) -> Option<Value> + Send + Sync + 'static,
    {
        if self.tags.contains_key(meta.name) {
            tracing::debug!(tag = meta.name, "replacing registered tag handler");
        }
        self.tags.insert(
            meta.name,
            RegisteredTag {
                meta,
                handler: Box::new(handler),
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Documentation for every registered tag, sorted by name
    pub fn tags(&self) -> impl Iterator<Item = &TagMeta> {
        self.tags.values().map(|t| &t.meta)
    }

    /// Answer the segment under the cursor
    ///
    /// The handler's own segment is fulfilled once it has run; handlers
    /// fulfill any further segments they consume themselves. An unknown name
    /// is recorded as a diagnostic and yields `None`.
    pub fn process(&self, object: &T, attribute: &mut Attribute<'_>) -> Option<Value> {
        let name = attribute.current_name()?;
        let Some(tag) = self.tags.get(name) else {
            attribute.echo_error(
                DiagnosticKind::UnknownTag,
                format!("Unknown tag '{}'", name),
            );
            return None;
        };
        let result = (tag.handler)(attribute, object);
        attribute.fulfill(1);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tags::attribute::TagContext;
    use crate::domain::tags::chain::AttributeChain;
    use crate::domain::time::{ManualClock, Timestamp};
    use crate::domain::warnings::{WarningRegistry, WarningSettings};
    use std::sync::Arc;

    struct Named(&'static str);

    fn context() -> TagContext {
        let clock = Arc::new(ManualClock::new(Timestamp::from_millis(0)));
        let warnings = Arc::new(WarningRegistry::new(
            WarningSettings::default(),
            clock.clone(),
        ));
        TagContext::new(warnings, clock)
    }

    fn processor() -> TagProcessor<Named> {
        let mut processor = TagProcessor::new();
        processor.register_tag(
            TagMeta {
                name: "name",
                syntax: "name",
                returns: "Element",
                description: "The object's name.",
            },
            |_attribute, object: &Named| Some(Value::element(object.0)),
        );
        processor
    }

    #[test]
    fn test_process_dispatches_by_name_and_fulfills() {
        let chain = AttributeChain::parse("name").unwrap();
        let ctx = context();
        let mut attribute = Attribute::new(&chain, &ctx);

        let result = processor().process(&Named("alice"), &mut attribute);
        assert_eq!(result, Some(Value::element("alice")));
        assert!(attribute.is_complete());
        assert!(attribute.diagnostics().is_empty());
    }

    #[test]
    fn test_process_unknown_tag_records_one_diagnostic() {
        let chain = AttributeChain::parse("nickname").unwrap();
        let ctx = context();
        let mut attribute = Attribute::new(&chain, &ctx);

        assert_eq!(processor().process(&Named("alice"), &mut attribute), None);
        assert_eq!(attribute.diagnostics().len(), 1);
        assert_eq!(attribute.diagnostics()[0].kind, DiagnosticKind::UnknownTag);
        assert!(!attribute.is_complete());
    }

    #[test]
    fn test_tags_are_listed_sorted() {
        let mut processor = processor();
        processor.register_tag(
            TagMeta {
                name: "age",
                syntax: "age",
                returns: "Number",
                description: "Always zero.",
            },
            |_, _: &Named| Some(Value::Integer(0)),
        );
        let names: Vec<&str> = processor.tags().map(|m| m.name).collect();
        assert_eq!(names, vec!["age", "name"]);
        assert!(processor.contains("age"));
        assert!(!processor.contains("flag"));
    }
}
