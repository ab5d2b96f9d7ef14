//! Attribute cursor and evaluation context
//!
//! An [`Attribute`] walks an [`AttributeChain`] left to right. Handlers look
//! at the segment under the cursor (and may peek further ahead), then fulfill
//! the segments they consumed. Errors never propagate out of a handler; they
//! are recorded on the attribute as [`TagDiagnostic`]s and the handler
//! returns `None`.

use crate::domain::tags::chain::{AttributeChain, AttributeSegment};
use crate::domain::time::{Clock, Timestamp};
use crate::domain::warnings::{WarningRegistry, WarningSpec};
use std::fmt;
use std::sync::Arc;

/// Interprets the raw text of a bracketed context
///
/// Contexts may themselves contain nested tags; evaluating those belongs to
/// the surrounding runtime.
pub trait ContextResolver: Send + Sync {
    fn resolve(&self, raw: &str) -> String;
}

/// Hands context text over unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralContext;

impl ContextResolver for LiteralContext {
    fn resolve(&self, raw: &str) -> String {
        raw.to_string()
    }
}

/// Kind of a recorded tag failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A required bracketed input was omitted
    MissingContext,
    /// No handler is registered for the segment name
    UnknownTag,
    /// Segments were left over after evaluation
    UnfilledAttributes,
}

/// A tag failure reported through the error side channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDiagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Byte offset of the segment that failed
    pub raw_index: usize,
}

impl fmt::Display for TagDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at position {})", self.message, self.raw_index)
    }
}

/// Shared collaborators for evaluating tags
#[derive(Clone)]
pub struct TagContext {
    warnings: Arc<WarningRegistry>,
    clock: Arc<dyn Clock>,
    resolver: Arc<dyn ContextResolver>,
    script: Option<String>,
}

impl fmt::Debug for TagContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagContext")
            .field("warnings", &self.warnings)
            .field("script", &self.script)
            .finish_non_exhaustive()
    }
}

impl TagContext {
    pub fn new(warnings: Arc<WarningRegistry>, clock: Arc<dyn Clock>) -> Self {
        TagContext {
            warnings,
            clock,
            resolver: Arc::new(LiteralContext),
            script: None,
        }
    }

    /// Name the script on whose behalf tags are evaluated, for diagnostics
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn ContextResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn warnings(&self) -> &WarningRegistry {
        &self.warnings
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }
}

/// Cursor over a chain during a single evaluation
#[derive(Debug)]
pub struct Attribute<'a> {
    chain: &'a AttributeChain,
    position: usize,
    context: &'a TagContext,
    diagnostics: Vec<TagDiagnostic>,
}

impl<'a> Attribute<'a> {
    pub fn new(chain: &'a AttributeChain, context: &'a TagContext) -> Self {
        Attribute {
            chain,
            position: 0,
            context,
            diagnostics: Vec::new(),
        }
    }

    /// Segment `n` positions into the unfulfilled part (1 = current)
    fn segment(&self, n: usize) -> Option<&'a AttributeSegment> {
        let index = (self.position + n).checked_sub(1)?;
        self.chain.segments().get(index)
    }

    /// Name of the segment under the cursor
    pub fn current_name(&self) -> Option<&'a str> {
        self.attribute_without_context(1)
    }

    /// Name of segment `n` (1 = current), ignoring its context
    pub fn attribute_without_context(&self, n: usize) -> Option<&'a str> {
        self.segment(n).map(|s| s.name.as_str())
    }

    /// True if segment `n` (1 = current) has a non-empty context
    pub fn has_context(&self, n: usize) -> bool {
        self.segment(n).is_some_and(AttributeSegment::has_context)
    }

    /// Resolved context of segment `n` (1 = current)
    pub fn get_context(&self, n: usize) -> Option<String> {
        self.segment(n)
            .filter(|s| s.has_context())
            .and_then(|s| s.context.as_deref())
            .map(|raw| self.context.resolver.resolve(raw))
    }

    /// Mark `n` segments as consumed
    pub fn fulfill(&mut self, n: usize) {
        self.position = (self.position + n).min(self.chain.len());
    }

    /// Segments not yet fulfilled
    pub fn remaining(&self) -> &'a [AttributeSegment] {
        &self.chain.segments()[self.position..]
    }

    pub fn is_complete(&self) -> bool {
        self.position >= self.chain.len()
    }

    /// Record a tag failure against the current segment
    pub fn echo_error(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        let raw_index = self.segment(1).map_or(0, |s| s.raw_index);
        tracing::debug!(
            tag = self.chain.raw(),
            script = self.context.script().unwrap_or("<none>"),
            ?kind,
            "{}",
            message
        );
        self.diagnostics.push(TagDiagnostic {
            kind,
            message,
            raw_index,
        });
    }

    /// Fire a warning on behalf of the running script
    pub fn warn(&self, spec: &WarningSpec) -> bool {
        self.context.warnings().warn(spec, self.context.script())
    }

    pub fn now(&self) -> Timestamp {
        self.context.now()
    }

    pub fn chain(&self) -> &'a AttributeChain {
        self.chain
    }

    pub fn diagnostics(&self) -> &[TagDiagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<TagDiagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::time::ManualClock;
    use crate::domain::warnings::WarningSettings;

    fn context() -> TagContext {
        let clock = Arc::new(ManualClock::new(Timestamp::from_millis(5_000)));
        let warnings = Arc::new(WarningRegistry::new(
            WarningSettings::default(),
            clock.clone(),
        ));
        TagContext::new(warnings, clock)
    }

    struct Upper;

    impl ContextResolver for Upper {
        fn resolve(&self, raw: &str) -> String {
            raw.to_uppercase()
        }
    }

    #[test]
    fn test_cursor_addresses_segments_relative_to_position() {
        let chain = AttributeChain::parse("flag[a].is_expired").unwrap();
        let ctx = context();
        let mut attribute = Attribute::new(&chain, &ctx);

        assert_eq!(attribute.current_name(), Some("flag"));
        assert_eq!(attribute.attribute_without_context(2), Some("is_expired"));
        assert!(attribute.has_context(1));
        assert!(!attribute.has_context(2));
        assert_eq!(attribute.get_context(1).as_deref(), Some("a"));

        attribute.fulfill(1);
        assert_eq!(attribute.current_name(), Some("is_expired"));
        assert_eq!(attribute.attribute_without_context(2), None);
        assert_eq!(attribute.remaining().len(), 1);

        attribute.fulfill(5);
        assert!(attribute.is_complete());
        assert_eq!(attribute.current_name(), None);
    }

    #[test]
    fn test_index_zero_is_never_a_segment() {
        let chain = AttributeChain::parse("flag[a]").unwrap();
        let ctx = context();
        let attribute = Attribute::new(&chain, &ctx);
        assert_eq!(attribute.attribute_without_context(0), None);
        assert!(!attribute.has_context(0));
    }

    #[test]
    fn test_empty_context_is_missing() {
        let chain = AttributeChain::parse("flag[]").unwrap();
        let ctx = context();
        let attribute = Attribute::new(&chain, &ctx);
        assert!(!attribute.has_context(1));
        assert_eq!(attribute.get_context(1), None);
    }

    #[test]
    fn test_context_goes_through_resolver() {
        let chain = AttributeChain::parse("flag[abc]").unwrap();
        let ctx = context().with_resolver(Arc::new(Upper));
        let attribute = Attribute::new(&chain, &ctx);
        assert_eq!(attribute.get_context(1).as_deref(), Some("ABC"));
    }

    #[test]
    fn test_echo_error_records_position() {
        let chain = AttributeChain::parse("list_flags.flag").unwrap();
        let ctx = context().with_script("demo");
        let mut attribute = Attribute::new(&chain, &ctx);
        attribute.fulfill(1);
        attribute.echo_error(DiagnosticKind::MissingContext, "needs input");

        let diagnostics = attribute.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::MissingContext);
        assert_eq!(diagnostics[0].raw_index, 11);
        assert_eq!(diagnostics[0].to_string(), "needs input (at position 11)");
    }

    #[test]
    fn test_now_comes_from_context_clock() {
        let chain = AttributeChain::parse("list_flags").unwrap();
        let ctx = context();
        let attribute = Attribute::new(&chain, &ctx);
        assert_eq!(attribute.now().millis(), 5_000);
    }
}
