/*
 * scenarios.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end scenarios for linkvars-template.
 */

use linkvars_template::{
    Dictionary, DocumentProperties, Invocation, Invoker, LinkKind, PreferenceTable, PropertyMap,
    PropertyValue, ResolveContext, SUPPRESSED, active_dictionary, expand, resolve,
};
use pretty_assertions::assert_eq;

fn endpoints() -> Dictionary {
    [
        ("SERVER1", "https://server1.com"),
        ("SERVER2", "https://server2.com"),
        ("API", "/api"),
        ("ADMIN", "/admin"),
    ]
    .into_iter()
    .collect()
}

fn values(template: &str, ctx: &ResolveContext<'_>, kind: LinkKind) -> Vec<String> {
    expand(template, ctx, kind)
        .into_iter()
        .map(|c| c.value)
        .collect()
}

#[test]
fn test_cartesian_endpoints() {
    let dict = endpoints();
    let ctx = ResolveContext::new(&dict);
    assert_eq!(
        values("${SERVER1,,SERVER2}${API,,ADMIN}/status", &ctx, LinkKind::Address),
        vec![
            "https://server1.com/api/status",
            "https://server1.com/admin/status",
            "https://server2.com/api/status",
            "https://server2.com/admin/status",
        ]
    );
}

#[test]
fn test_expansion_is_deterministic() {
    let dict = endpoints();
    let ctx = ResolveContext::new(&dict);
    let template = "${SERVER1,,SERVER2}${API,,ADMIN}/${x,,y,,z}";
    let first = expand(template, &ctx, LinkKind::Address);
    let second = expand(template, &ctx, LinkKind::Address);
    assert_eq!(first.len(), 12);
    assert_eq!(first, second);
}

#[test]
fn test_nested_property_backup() {
    let dict = Dictionary::new();
    let mut metadata = PropertyMap::new();
    metadata.insert("Today".to_string(), PropertyValue::from("2025-01-01"));
    let doc = DocumentProperties::structural("journal/today.md", Some(metadata));
    let ctx = ResolveContext::new(&dict).with_properties(&doc);

    assert_eq!(
        values("${${L:Today},,${L:Today}_backup}", &ctx, LinkKind::Structural),
        vec!["2025-01-01", "2025-01-01_backup"]
    );
}

#[test]
fn test_property_missing_vs_no_metadata() {
    let dict = Dictionary::new();

    let with_metadata = DocumentProperties::structural("a.md", Some(PropertyMap::new()));
    let ctx = ResolveContext::new(&dict).with_properties(&with_metadata);
    let r = resolve("${L:missing}", &ctx, LinkKind::Structural);
    assert_eq!(r.text, "");
    assert!(!r.is_ok());

    let without_metadata = DocumentProperties::structural("b.md", None);
    let ctx = ResolveContext::new(&dict).with_properties(&without_metadata);
    let r = resolve("${L:missing}", &ctx, LinkKind::Structural);
    assert_eq!(r.text, "${L:missing}");
    assert!(r.is_ok());
}

#[test]
fn test_profile_suppression_end_to_end() {
    let defaults: Dictionary = [("RCLONE", "x"), ("DOWNLOADS", "y")].into_iter().collect();
    let laptop: Dictionary = [("RCLONE", SUPPRESSED)].into_iter().collect();
    let active = active_dictionary(&defaults, Some(&laptop));
    let prefs = PreferenceTable::new();

    let invoker =
        Invoker::new(ResolveContext::new(&active), &prefs).with_profile_override(Some(&laptop));
    match invoker.invoke("${RCLONE,,DOWNLOADS}", LinkKind::Address) {
        Ok(Invocation::Single(target)) => assert_eq!(target.value, "y"),
        other => panic!("unexpected invocation: {other:?}"),
    }

    // The same template on a profile without overrides offers both.
    let active = active_dictionary(&defaults, None);
    let invoker = Invoker::new(ResolveContext::new(&active), &prefs);
    match invoker.invoke("${RCLONE,,DOWNLOADS}", LinkKind::Address) {
        Ok(Invocation::Choice(request)) => {
            let values: Vec<_> = request.options.iter().map(|t| t.value.as_str()).collect();
            assert_eq!(values, vec!["x", "y"]);
        }
        other => panic!("unexpected invocation: {other:?}"),
    }
}

#[test]
fn test_structural_option_values_are_sanitized() {
    let dict: Dictionary = [("DIR", "projects/2025"), ("ARCHIVE", "archive:old")]
        .into_iter()
        .collect();
    let ctx = ResolveContext::new(&dict).with_substitution("-");
    let candidates = expand("${DIR,,ARCHIVE}/index", &ctx, LinkKind::Structural);
    let got: Vec<_> = candidates
        .iter()
        .map(|c| (c.value.as_str(), c.display.as_str()))
        .collect();
    assert_eq!(
        got,
        vec![
            ("projects-2025/index", "projects-2025"),
            ("archive-old/index", "archive-old"),
        ]
    );
}
