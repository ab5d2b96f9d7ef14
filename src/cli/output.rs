//! Output formatting utilities

use crate::application::TagOutcome;
use crate::domain::tags::TagMeta;
use crate::domain::warnings::{WarningKind, WarningReport};

/// Format a tag result for display
pub fn format_outcome(outcome: &TagOutcome) -> String {
    match &outcome.value {
        Some(value) => value.to_string(),
        None => "null".to_string(),
    }
}

/// Format registered tags for display
pub fn format_tag_list(tags: &[TagMeta]) -> String {
    if tags.is_empty() {
        return "No tags registered".to_string();
    }

    let width = tags.iter().map(|t| t.syntax.len()).max().unwrap_or(0);
    let mut output = String::new();
    for tag in tags {
        output.push_str(&format!(
            "{:<width$}  -> {}\n    {}\n",
            tag.syntax,
            tag.returns,
            tag.description,
            width = width
        ));
    }
    output
}

/// Format warning counters for display
pub fn format_warning_report(reports: &[WarningReport]) -> String {
    if reports.is_empty() {
        return "No warnings fired\n".to_string();
    }

    let mut output = String::new();
    for report in reports {
        let kind = match report.kind {
            WarningKind::Standard => "standard",
            WarningKind::Deprecation => "deprecation",
            WarningKind::Slow => "slow",
        };
        output.push_str(&format!(
            "{} ({}): emitted {}, suppressed {}\n",
            report.id, kind, report.emitted, report.suppressed
        ));
    }
    output
}
