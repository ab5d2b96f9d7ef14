//! Attribute chain parsing
//!
//! Turns a raw tag such as `flag[my_flag].is_expired` into an ordered list of
//! segments. Each segment has a lowercase name and at most one bracketed
//! context string. Brackets may nest, and dots inside brackets belong to the
//! context, so `flag[<other.flag[x]>]` is a single segment.
//!
//! # Examples
//!
//! ```
//! use flagtag::domain::tags::AttributeChain;
//!
//! let chain = AttributeChain::parse("<flag[score].is_expired>").unwrap();
//! assert_eq!(chain.len(), 2);
//! assert_eq!(chain.segments()[0].name, "flag");
//! assert_eq!(chain.segments()[0].context.as_deref(), Some("score"));
//! assert_eq!(chain.segments()[1].name, "is_expired");
//! ```

use crate::error::{FlagTagError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Segment names: letters and underscores only
fn segment_name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[A-Za-z_]+$").unwrap())
}

/// One `name[context]` element of a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSegment {
    /// Lowercased segment name
    pub name: String,
    /// Raw text between the brackets, if any
    pub context: Option<String>,
    /// Byte offset of the segment in the parsed input
    pub raw_index: usize,
}

impl AttributeSegment {
    /// True when the segment carries a non-empty context
    pub fn has_context(&self) -> bool {
        self.context.as_deref().is_some_and(|c| !c.is_empty())
    }
}

impl fmt::Display for AttributeSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{}[{}]", self.name, context),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Immutable, parsed attribute chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChain {
    raw: String,
    segments: Vec<AttributeSegment>,
}

impl AttributeChain {
    /// Parse a tag string into its segments
    ///
    /// An optional surrounding `<` `>` pair is stripped first.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let body = trimmed
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .unwrap_or(trimmed);

        if body.is_empty() {
            return Err(FlagTagError::parse(body, 0, "empty tag"));
        }

        let mut segments = Vec::new();
        let mut start = 0;
        let mut depth = 0usize;
        let mut context_start = None;
        let mut closed_at = None;

        for (i, c) in body.char_indices() {
            match c {
                '[' => {
                    if depth == 0 {
                        if closed_at.is_some() {
                            return Err(FlagTagError::parse(
                                body,
                                i,
                                "segment has more than one context",
                            ));
                        }
                        context_start = Some(i);
                    }
                    depth += 1;
                }
                ']' => {
                    if depth == 0 {
                        return Err(FlagTagError::parse(body, i, "unbalanced ']'"));
                    }
                    depth -= 1;
                    if depth == 0 {
                        closed_at = Some(i);
                    }
                }
                '.' if depth == 0 => {
                    segments.push(Self::build_segment(body, start, i, context_start, closed_at)?);
                    start = i + 1;
                    context_start = None;
                    closed_at = None;
                }
                _ if depth == 0 && closed_at.is_some() => {
                    return Err(FlagTagError::parse(
                        body,
                        i,
                        "unexpected text after closing bracket",
                    ));
                }
                _ => {}
            }
        }

        if depth > 0 {
            let open = context_start.unwrap_or(start);
            return Err(FlagTagError::parse(body, open, "unclosed '['"));
        }
        segments.push(Self::build_segment(
            body,
            start,
            body.len(),
            context_start,
            closed_at,
        )?);

        Ok(AttributeChain {
            raw: body.to_string(),
            segments,
        })
    }

    /// Build the segment spanning `body[start..end]`
    fn build_segment(
        body: &str,
        start: usize,
        end: usize,
        context_start: Option<usize>,
        closed_at: Option<usize>,
    ) -> Result<AttributeSegment> {
        let name_end = context_start.unwrap_or(end);
        let name = &body[start..name_end];

        if name.is_empty() {
            return Err(FlagTagError::parse(body, start, "empty segment name"));
        }
        if !segment_name_regex().is_match(name) {
            return Err(FlagTagError::parse(
                body,
                start,
                format!("invalid segment name '{}'", name),
            ));
        }

        let context = match (context_start, closed_at) {
            (Some(open), Some(close)) => Some(body[open + 1..close].to_string()),
            _ => None,
        };

        Ok(AttributeSegment {
            name: name.to_lowercase(),
            context,
            raw_index: start,
        })
    }

    /// The tag text this chain was parsed from, without `<` `>`
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[AttributeSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for AttributeChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.segments.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}
