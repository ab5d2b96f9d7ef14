//! Tag system

pub mod attribute;
pub mod chain;
pub mod processor;

// Re-export main types
pub use attribute::{
    Attribute, ContextResolver, DiagnosticKind, LiteralContext, TagContext, TagDiagnostic,
};
pub use chain::{AttributeChain, AttributeSegment};
pub use processor::{TagHandler, TagMeta, TagProcessor};
