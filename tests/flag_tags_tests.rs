//! End-to-end tag evaluation against a flag holder

use chrono::Duration;
use flagtag::application::EvaluateTagService;
use flagtag::domain::flags::{FLAG_EXPIRATION_TAG, FLAG_IS_EXPIRED_TAG, LIST_FLAGS_TAG};
use flagtag::domain::tags::{DiagnosticKind, TagContext};
use flagtag::domain::{
    Clock, FlagHolder, FlagTracker, ManualClock, Timestamp, Value, WarningRegistry,
    WarningSettings,
};
use std::sync::Arc;
use std::thread;

struct World {
    clock: Arc<ManualClock>,
    warnings: Arc<WarningRegistry>,
    holder: FlagHolder,
    service: EvaluateTagService,
}

fn world() -> World {
    let clock = Arc::new(ManualClock::new(Timestamp::from_millis(1_700_000_000_000)));
    let warnings = Arc::new(WarningRegistry::new(
        WarningSettings::default(),
        clock.clone(),
    ));
    let context = TagContext::new(warnings.clone(), clock.clone()).with_script("test_script");
    World {
        holder: FlagHolder::new("npc", clock.clone()),
        service: EvaluateTagService::new(context),
        clock,
        warnings,
    }
}

fn value_of(w: &World, tag: &str) -> Option<Value> {
    w.service.execute(&w.holder, tag).unwrap().value
}

#[test]
fn test_flag_lifecycle_through_tags() {
    let w = world();
    let expires = w.clock.now().plus(Duration::seconds(10));
    w.holder
        .flags()
        .set_flag("temp", Value::element("hot"), Some(expires));

    assert_eq!(value_of(&w, "flag[temp]"), Some(Value::element("hot")));
    assert_eq!(value_of(&w, "has_flag[temp]"), Some(Value::Boolean(true)));
    assert_eq!(value_of(&w, "flag_expiration[temp]"), Some(Value::Time(expires)));
    assert_eq!(value_of(&w, "list_flags"), Some(Value::element_list(["temp"])));

    let legacy = value_of(&w, "flag[temp].expiration").unwrap();
    assert_eq!(legacy.as_duration().unwrap().seconds(), -10.0);
    assert_eq!(value_of(&w, "flag[temp].is_expired"), Some(Value::Boolean(false)));

    w.clock.advance(Duration::seconds(11));

    assert_eq!(value_of(&w, "flag[temp]"), None);
    assert_eq!(value_of(&w, "has_flag[temp]"), Some(Value::Boolean(false)));
    assert_eq!(value_of(&w, "flag[temp].is_expired"), Some(Value::Boolean(true)));
    assert_eq!(value_of(&w, "list_flags"), Some(Value::List(vec![])));
    // The expiration instant outlives the flag itself
    assert_eq!(value_of(&w, "flag_expiration[temp]"), Some(Value::Time(expires)));
}

#[test]
fn test_absent_flag_is_null_without_diagnostics() {
    let w = world();
    let outcome = w.service.execute(&w.holder, "flag[missing]").unwrap();
    assert!(outcome.is_null());
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_unfilled_attributes_void_the_value() {
    let w = world();
    w.holder.flags().set_flag("score", Value::Integer(42), None);

    let outcome = w.service.execute(&w.holder, "flag[score].colour").unwrap();
    assert!(outcome.is_null());
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::UnfilledAttributes);
    assert!(outcome.diagnostics[0].message.contains("colour"));
}

#[test]
fn test_missing_input_is_one_diagnostic() {
    let w = world();
    for tag in ["flag", "has_flag", "flag_expiration[]"] {
        let outcome = w.service.execute(&w.holder, tag).unwrap();
        assert!(outcome.is_null(), "{} should be null", tag);
        assert_eq!(outcome.diagnostics.len(), 1, "{}", tag);
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::MissingContext);
    }
}

#[test]
fn test_deprecations_are_throttled_per_form() {
    let w = world();

    for _ in 0..5 {
        value_of(&w, "flag[a].is_expired");
        value_of(&w, "flag[a].expiration");
    }
    assert_eq!(w.warnings.emitted(FLAG_IS_EXPIRED_TAG.id), 1);
    assert_eq!(w.warnings.suppressed(FLAG_IS_EXPIRED_TAG.id), 4);
    assert_eq!(w.warnings.emitted(FLAG_EXPIRATION_TAG.id), 1);

    w.clock.advance(Duration::seconds(10));
    value_of(&w, "flag[a].is_expired");
    assert_eq!(w.warnings.emitted(FLAG_IS_EXPIRED_TAG.id), 2);
}

#[test]
fn test_list_flags_warning_window() {
    let w = world();
    w.holder.flags().set_flag("a", Value::Integer(1), None);

    for _ in 0..10 {
        value_of(&w, "list_flags");
        w.clock.advance(Duration::milliseconds(500));
    }
    // 10 fires over 5 seconds land in a single window
    assert_eq!(w.warnings.emitted(LIST_FLAGS_TAG.id), 1);

    w.clock.advance(Duration::seconds(10));
    value_of(&w, "list_flags");
    assert_eq!(w.warnings.emitted(LIST_FLAGS_TAG.id), 2);
    assert_eq!(w.warnings.suppressed(LIST_FLAGS_TAG.id), 9);

    w.warnings.reset();
    value_of(&w, "list_flags");
    assert_eq!(w.warnings.emitted(LIST_FLAGS_TAG.id), 1);
}

#[test]
fn test_concurrent_list_flags_emits_once() {
    let w = Arc::new(world());
    w.holder.flags().set_flag("a", Value::Integer(1), None);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let w = Arc::clone(&w);
            thread::spawn(move || {
                for _ in 0..50 {
                    assert_eq!(value_of(&w, "list_flags"), Some(Value::element_list(["a"])));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(w.warnings.emitted(LIST_FLAGS_TAG.id), 1);
    assert_eq!(w.warnings.suppressed(LIST_FLAGS_TAG.id), 399);
}
