//! Flag tags: `flag`, `has_flag`, `flag_expiration` and `list_flags`
//!
//! Every handler funnels failure into `None` plus a diagnostic on the
//! attribute; a missing or expired flag is not a failure at all.

use crate::domain::flags::tracker::{FlagTracker, Flaggable};
use crate::domain::tags::{Attribute, DiagnosticKind, TagMeta, TagProcessor};
use crate::domain::value::Value;
use crate::domain::warnings::WarningSpec;

pub const FLAG_IS_EXPIRED_TAG: WarningSpec = WarningSpec::deprecation(
    "flag_is_expired_tag",
    "The 'flag[...].is_expired' tag is deprecated: use 'has_flag[...]' instead.",
);

pub const FLAG_EXPIRATION_TAG: WarningSpec = WarningSpec::deprecation(
    "flag_expiration_tag",
    "The 'flag[...].expiration' tag is deprecated: use 'flag_expiration[...]' instead.",
);

pub const LIST_FLAGS_TAG: WarningSpec = WarningSpec::slow(
    "list_flags_tag",
    "The list_flags tag is meant for testing/debugging only. Do not use it in scripts (ignore this warning if using for testing reasons).",
);

/// Legacy forms recognized after `flag[...]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LegacyFlagForm {
    IsExpired,
    Expiration,
}

impl LegacyFlagForm {
    fn from_segment(name: Option<&str>) -> Option<Self> {
        match name? {
            "is_expired" => Some(LegacyFlagForm::IsExpired),
            "expiration" => Some(LegacyFlagForm::Expiration),
            _ => None,
        }
    }
}

/// Wire the four flag tags into an object type's processor
pub fn register_flag_handlers<T: Flaggable + 'static>(processor: &mut TagProcessor<T>) {
    processor.register_tag(
        TagMeta {
            name: "flag",
            syntax: "flag[<name>]",
            returns: "Object",
            description: "Returns the specified flag from the flaggable object. \
                If the flag is expired, returns null. Consider also using has_flag.",
        },
        |attribute, object: &T| flag_tag(object.flag_tracker(), attribute),
    );

    processor.register_tag(
        TagMeta {
            name: "has_flag",
            syntax: "has_flag[<flag_name>]",
            returns: "Boolean",
            description: "Returns true if the flaggable object has the specified flag, \
                otherwise returns false.",
        },
        |attribute, object: &T| has_flag_tag(object.flag_tracker(), attribute),
    );

    processor.register_tag(
        TagMeta {
            name: "flag_expiration",
            syntax: "flag_expiration[<flag_name>]",
            returns: "Time",
            description: "Returns the time at which the specified flag will expire.",
        },
        |attribute, object: &T| flag_expiration_tag(object.flag_tracker(), attribute),
    );

    processor.register_tag(
        TagMeta {
            name: "list_flags",
            syntax: "list_flags",
            returns: "List",
            description: "Returns a list of the flaggable object's flags. \
                This is exclusively for debug/testing reasons, and should never be used in a real script.",
        },
        |attribute, object: &T| list_flags_tag(object.flag_tracker(), attribute),
    );
}

/// Extract the required flag name of the current segment, reporting if absent
fn required_key(attribute: &mut Attribute<'_>, tag: &str) -> Option<String> {
    let key = attribute.get_context(1);
    if key.is_none() {
        attribute.echo_error(
            DiagnosticKind::MissingContext,
            format!("The {}[...] tag must have an input!", tag),
        );
    }
    key
}

/// `flag[<name>]`, plus the deprecated `.is_expired` and `.expiration` forms
pub fn flag_tag(tracker: &dyn FlagTracker, attribute: &mut Attribute<'_>) -> Option<Value> {
    let key = required_key(attribute, "flag")?;

    match LegacyFlagForm::from_segment(attribute.attribute_without_context(2)) {
        Some(LegacyFlagForm::IsExpired) => {
            attribute.warn(&FLAG_IS_EXPIRED_TAG);
            attribute.fulfill(1);
            Some(Value::Boolean(!tracker.has_flag(&key)))
        }
        Some(LegacyFlagForm::Expiration) => {
            attribute.warn(&FLAG_EXPIRATION_TAG);
            attribute.fulfill(1);
            let expires = tracker.get_flag_expiration_time(&key)?;
            // Time elapsed since expiry, negative while the flag is live
            Some(Value::Duration(attribute.now().since(expires)))
        }
        None => tracker.get_flag_value(&key),
    }
}

/// `has_flag[<name>]`
pub fn has_flag_tag(tracker: &dyn FlagTracker, attribute: &mut Attribute<'_>) -> Option<Value> {
    let key = required_key(attribute, "has_flag")?;
    Some(Value::Boolean(tracker.has_flag(&key)))
}

/// `flag_expiration[<name>]`
pub fn flag_expiration_tag(
    tracker: &dyn FlagTracker,
    attribute: &mut Attribute<'_>,
) -> Option<Value> {
    let key = required_key(attribute, "flag_expiration")?;
    tracker.get_flag_expiration_time(&key).map(Value::Time)
}

/// `list_flags`
pub fn list_flags_tag(tracker: &dyn FlagTracker, attribute: &mut Attribute<'_>) -> Option<Value> {
    attribute.warn(&LIST_FLAGS_TAG);
    Some(Value::element_list(tracker.list_all_flags()))
}
