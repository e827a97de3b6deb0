/*
 * expander.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Alternation ("OR pattern") expansion.
//!
//! A placeholder whose content contains `,,` at its top level lists
//! alternatives: `${SERVER1,,SERVER2}`. Every top-level alternation group of
//! a template contributes one dimension, and expansion enumerates the
//! cartesian product of all groups:
//!
//! ```text
//! ${A,,B}${C,,D,,E}  ->  A+C, A+D, A+E, B+C, B+D, B+E
//! ```
//!
//! The first group varies slowest. Bare options are sugar for a placeholder
//! (`A` means `${A}`); options that already contain `${` are used verbatim,
//! so literal text can be mixed in (`${${KEY}_suffix,,${OTHER}}`).
//!
//! Alternation nested inside an option does not join the product. After the
//! outer option is spliced in, the resolver sees it as an ordinary span.

use crate::error::PropertyError;
use crate::resolver::{
    ALTERNATION_SEPARATOR, LinkKind, PROPERTY_PREFIX, ResolveContext, is_alternation, resolve,
    sanitize,
};
use crate::scanner::{self, OPEN, Scanner, Span};
use serde::Serialize;
use tracing::debug;

/// Separator between option texts in a candidate label.
pub const LABEL_SEPARATOR: &str = " + ";

/// Upper bound on the candidate buffer reserved up front.
const MAX_PREALLOCATED: usize = 1024;

/// One fully resolved alternative of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Raw option texts of the combination, joined with `" + "`.
    pub label: String,

    /// The template with the combination spliced in and resolved.
    pub value: String,

    /// What to show for this candidate in a choice list.
    pub display: String,

    /// Dictionary keys referenced by the chosen options.
    pub keys: Vec<String>,

    /// Properties that failed to resolve for this candidate.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub property_errors: Vec<PropertyError>,
}

/// An option of an alternation group.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Choice {
    /// As written in the template.
    raw: String,
    /// After bare-word wrapping.
    expr: String,
}

impl Choice {
    fn new(raw: &str) -> Self {
        let expr = if raw.is_empty() || raw.contains(OPEN) {
            raw.to_string()
        } else {
            format!("{OPEN}{raw}}}")
        };
        Self {
            raw: raw.to_string(),
            expr,
        }
    }
}

#[derive(Debug, Clone)]
struct Group {
    span: Span,
    choices: Vec<Choice>,
}

impl Group {
    fn new(span: Span) -> Self {
        let choices = scanner::split_top_level(&span.content, ALTERNATION_SEPARATOR)
            .into_iter()
            .map(Choice::new)
            .collect();
        Self { span, choices }
    }
}

/// Check whether `text` has at least one top-level alternation group.
pub fn has_alternation(text: &str) -> bool {
    Scanner::new(text).any(|span| is_alternation(&span.content))
}

/// Every top-level `${...}` span of `text`.
pub fn extract_balanced_patterns(text: &str) -> Vec<Span> {
    scanner::scan(text)
}

/// The dictionary key a single placeholder expression refers to.
///
/// Only `${KEY}` with nothing nested and no property prefix counts.
pub fn referenced_key(expr: &str) -> Option<&str> {
    let key = expr.strip_prefix(OPEN)?.strip_suffix('}')?;
    let plain = !key.is_empty()
        && !key.contains(['{', '}'])
        && !key.starts_with(PROPERTY_PREFIX);
    plain.then_some(key)
}

/// Dictionary keys referenced directly by the top-level spans of `text`.
pub fn referenced_keys(text: &str) -> Vec<String> {
    let mut keys = Vec::new();
    for span in Scanner::new(text) {
        if let Some(key) = referenced_key(&span.matched) {
            push_unique(&mut keys, key);
        }
    }
    keys
}

fn push_unique(keys: &mut Vec<String>, key: &str) {
    let lower = key.to_lowercase();
    if !keys.iter().any(|k| k.to_lowercase() == lower) {
        keys.push(key.to_string());
    }
}

/// Expand `text` into every combination of its alternation groups.
///
/// Without alternation this returns a single candidate holding the plain
/// resolution of `text`.
pub fn expand(text: &str, context: &ResolveContext<'_>, kind: LinkKind) -> Vec<Candidate> {
    let groups: Vec<Group> = Scanner::new(text)
        .filter(|span| is_alternation(&span.content))
        .map(Group::new)
        .collect();

    if groups.is_empty() {
        let resolution = resolve(text, context, kind);
        return vec![Candidate {
            label: text.to_string(),
            display: resolution.text.clone(),
            value: resolution.text,
            keys: Vec::new(),
            property_errors: resolution.property_errors,
        }];
    }

    let total = combination_count(&groups);
    debug!(groups = groups.len(), total, "expanding alternation");

    let mut candidates = Vec::with_capacity(total.min(MAX_PREALLOCATED));
    let mut indices = vec![0usize; groups.len()];
    loop {
        candidates.push(build_candidate(text, &groups, &indices, context, kind));

        // Odometer step: the last group turns fastest.
        let mut pos = groups.len();
        loop {
            if pos == 0 {
                return candidates;
            }
            pos -= 1;
            indices[pos] += 1;
            if indices[pos] < groups[pos].choices.len() {
                break;
            }
            indices[pos] = 0;
        }
    }
}

/// Number of combinations of `groups`, saturating at `usize::MAX`.
fn combination_count(groups: &[Group]) -> usize {
    groups
        .iter()
        .fold(1, |acc, g| acc.saturating_mul(g.choices.len()))
}

fn build_candidate(
    text: &str,
    groups: &[Group],
    indices: &[usize],
    context: &ResolveContext<'_>,
    kind: LinkKind,
) -> Candidate {
    let chosen: Vec<&Choice> = groups
        .iter()
        .zip(indices)
        .map(|(group, &i)| &group.choices[i])
        .collect();

    let mut spliced = String::with_capacity(text.len());
    let mut cursor = 0;
    for (group, choice) in groups.iter().zip(&chosen) {
        spliced.push_str(&text[cursor..group.span.start]);
        spliced.push_str(&choice.expr);
        cursor = group.span.end;
    }
    spliced.push_str(&text[cursor..]);

    let resolution = resolve(&spliced, context, kind);

    let mut keys = Vec::new();
    for choice in &chosen {
        if let Some(key) = referenced_key(&choice.expr) {
            push_unique(&mut keys, key);
        }
    }

    let label = chosen
        .iter()
        .map(|c| c.raw.as_str())
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR);

    let first = chosen[0];
    let display = referenced_key(&first.expr)
        .and_then(|key| context.dictionary.get(key))
        .map_or_else(
            || first.raw.clone(),
            |value| sanitize(value, kind, context.substitution),
        );

    Candidate {
        label,
        value: resolution.text,
        display,
        keys,
        property_errors: resolution.property_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use crate::value::{DocumentProperties, PropertyMap, PropertyValue};
    use pretty_assertions::assert_eq;

    fn values(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.value.as_str()).collect()
    }

    fn labels(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_has_alternation() {
        assert!(has_alternation("${A,,B}"));
        assert!(has_alternation("x/${A}/${B,,C}"));
        assert!(!has_alternation("${A}/${B}"));
        assert!(!has_alternation("A,,B"));
        assert!(!has_alternation("${A,,B"));
        // Only top-level groups count.
        assert!(!has_alternation("${${A,,B}x}"));
    }

    #[test]
    fn test_cartesian_order() {
        let dict: Dictionary = [("A", "a"), ("B", "b"), ("C", "c"), ("D", "d"), ("E", "e")]
            .into_iter()
            .collect();
        let ctx = ResolveContext::new(&dict);
        let candidates = expand("${A,,B}${C,,D,,E}", &ctx, LinkKind::Address);

        assert_eq!(
            labels(&candidates),
            vec!["A + C", "A + D", "A + E", "B + C", "B + D", "B + E"]
        );
        assert_eq!(values(&candidates), vec!["ac", "ad", "ae", "bc", "bd", "be"]);
        assert_eq!(candidates[4].keys, vec!["B", "D"]);
    }

    #[test]
    fn test_combination_count_saturates() {
        let groups = |text: &str| -> Vec<Group> { Scanner::new(text).map(Group::new).collect() };
        assert_eq!(combination_count(&groups("${A,,B}${C,,D,,E}")), 6);
        assert_eq!(combination_count(&groups(&"${A,,B}".repeat(70))), usize::MAX);
    }

    #[test]
    fn test_bare_words_match_explicit_placeholders() {
        let dict: Dictionary = [("one", "1"), ("two", "2")].into_iter().collect();
        let ctx = ResolveContext::new(&dict);
        let sugar = expand("${one,,two}", &ctx, LinkKind::Address);
        let explicit = expand("${${one},,${two}}", &ctx, LinkKind::Address);
        assert_eq!(values(&sugar), values(&explicit));
        assert_eq!(values(&sugar), vec!["1", "2"]);
        assert_eq!(sugar[0].keys, explicit[0].keys);
    }

    #[test]
    fn test_without_alternation_single_candidate() {
        let dict: Dictionary = [("A", "x")].into_iter().collect();
        let ctx = ResolveContext::new(&dict);
        let candidates = expand("${A}/y", &ctx, LinkKind::Address);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].value, "x/y");
        assert!(candidates[0].keys.is_empty());
    }

    #[test]
    fn test_display_uses_first_group_value() {
        let dict: Dictionary = [("SERVER", "https://a.com"), ("API", "/api")]
            .into_iter()
            .collect();
        let ctx = ResolveContext::new(&dict);
        let candidates = expand("${SERVER,,local}${API,,x}", &ctx, LinkKind::Address);
        assert_eq!(candidates[0].display, "https://a.com");
        assert_eq!(candidates[2].display, "local");
        // Unknown bare options stay wrapped after resolution.
        assert_eq!(candidates[2].value, "${local}/api");
    }

    #[test]
    fn test_mixed_literal_options() {
        let dict: Dictionary = [("KEY", "base")].into_iter().collect();
        let ctx = ResolveContext::new(&dict);
        let candidates = expand("${${KEY}_suffix,,${KEY}}", &ctx, LinkKind::Address);
        assert_eq!(values(&candidates), vec!["base_suffix", "base"]);
        // Mixed text is not a plain key reference.
        assert!(candidates[0].keys.is_empty());
        assert_eq!(candidates[1].keys, vec!["KEY"]);
    }

    #[test]
    fn test_empty_option_is_empty_text() {
        let dict: Dictionary = [("A", "a")].into_iter().collect();
        let ctx = ResolveContext::new(&dict);
        let candidates = expand("file${,,_backup}", &ctx, LinkKind::Address);
        assert_eq!(values(&candidates), vec!["file", "file${_backup}"]);
    }

    #[test]
    fn test_nested_property_alternation() {
        let dict = Dictionary::new();
        let mut metadata = PropertyMap::new();
        metadata.insert("Today".to_string(), PropertyValue::from("2025-01-01"));
        let doc = DocumentProperties::structural("daily.md", Some(metadata));
        let ctx = ResolveContext::new(&dict).with_properties(&doc);

        let candidates = expand("${${L:Today},,${L:Today}_backup}", &ctx, LinkKind::Structural);
        assert_eq!(values(&candidates), vec!["2025-01-01", "2025-01-01_backup"]);
        assert!(candidates.iter().all(|c| c.keys.is_empty()));
    }

    #[test]
    fn test_inner_alternation_is_not_flattened() {
        let dict: Dictionary = [("C", "c")].into_iter().collect();
        let ctx = ResolveContext::new(&dict);
        let candidates = expand("${${A,,B}x,,C}", &ctx, LinkKind::Address);
        assert_eq!(candidates.len(), 2);
        assert_eq!(values(&candidates), vec!["${A,,B}x", "c"]);
    }

    #[test]
    fn test_property_error_recorded_per_candidate() {
        let dict: Dictionary = [("A", "a")].into_iter().collect();
        let doc = DocumentProperties::structural("n.md", Some(PropertyMap::new()));
        let ctx = ResolveContext::new(&dict).with_properties(&doc);
        let candidates = expand("${A,,${L:gone}}", &ctx, LinkKind::Address);
        assert!(candidates[0].property_errors.is_empty());
        assert_eq!(candidates[1].property_errors.len(), 1);
        assert_eq!(candidates[1].value, "");
    }

    #[test]
    fn test_referenced_key() {
        assert_eq!(referenced_key("${KEY}"), Some("KEY"));
        assert_eq!(referenced_key("${L:prop}"), None);
        assert_eq!(referenced_key("${${K}}"), None);
        assert_eq!(referenced_key("${K}x"), None);
        assert_eq!(referenced_key("${A}${B}"), None);
        assert_eq!(referenced_keys("${A}/${b}/${a}/${L:x}"), vec!["A", "b"]);
    }
}
