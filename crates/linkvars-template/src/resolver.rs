/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Placeholder resolution.
//!
//! Replaces every top-level `${...}` span of a template with its value:
//!
//! - `${KEY}`: dictionary lookup (case-insensitive); unknown keys are echoed
//! - `${L:name}`: property of the active document
//! - `${${INNER}rest}`: nested placeholders are resolved first and the result
//!   is used as the key
//!
//! Spans that are alternation groups (`${A,,B}`) are left as they are; they
//! are handled by [`crate::expander`].

use crate::dictionary::Dictionary;
use crate::error::PropertyError;
use crate::scanner::{self, OPEN, Span};
use crate::value::{NoDocument, PropertyLookup, PropertySource};
use tracing::{trace, warn};

/// Prefix selecting a document property instead of a dictionary key.
pub const PROPERTY_PREFIX: &str = "L:";

/// Separator between the options of an alternation group.
pub const ALTERNATION_SEPARATOR: &str = ",,";

/// Replacement for path-hostile characters in structural links.
pub const DEFAULT_SUBSTITUTION: &str = " ";

/// Characters that cannot appear in a structural (host-internal) link target.
const STRUCTURAL_RESERVED: [char; 3] = ['/', '\\', ':'];

/// How the resolved text will be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// A reference into the host's own document space. Resolved values are
    /// sanitized.
    Structural,
    /// An external address (URL, filesystem path). Values are used verbatim.
    Address,
}

impl LinkKind {
    pub fn is_structural(self) -> bool {
        self == LinkKind::Structural
    }
}

/// Everything a resolution reads.
#[derive(Clone, Copy)]
pub struct ResolveContext<'a> {
    /// The active dictionary, already merged for the current profile.
    pub dictionary: &'a Dictionary,

    /// Metadata of the active document.
    pub properties: &'a dyn PropertySource,

    /// Replacement for `/`, `\` and `:` in structural links.
    pub substitution: &'a str,
}

impl<'a> ResolveContext<'a> {
    /// Create a context with no active document and the default substitution.
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self {
            dictionary,
            properties: &NoDocument,
            substitution: DEFAULT_SUBSTITUTION,
        }
    }

    pub fn with_properties(mut self, properties: &'a dyn PropertySource) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_substitution(mut self, substitution: &'a str) -> Self {
        self.substitution = substitution;
        self
    }
}

impl std::fmt::Debug for ResolveContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolveContext")
            .field("dictionary", self.dictionary)
            .field("document", &self.properties.document_name())
            .field("substitution", &self.substitution)
            .finish()
    }
}

/// The outcome of one resolution call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// The resolved text. Missing properties contribute an empty string.
    pub text: String,

    /// Properties that were referenced but not defined by the document.
    pub property_errors: Vec<PropertyError>,
}

impl Resolution {
    /// True when no property lookup failed.
    pub fn is_ok(&self) -> bool {
        self.property_errors.is_empty()
    }
}

/// Resolve every non-alternation placeholder in `text`.
pub fn resolve(text: &str, context: &ResolveContext<'_>, kind: LinkKind) -> Resolution {
    let mut property_errors = Vec::new();
    let text = resolve_text(text, context, kind, &mut property_errors);
    Resolution {
        text,
        property_errors,
    }
}

/// Replace `/`, `\` and `:` by `substitution` when the link is structural.
pub fn sanitize(value: &str, kind: LinkKind, substitution: &str) -> String {
    if kind.is_structural() {
        value.replace(STRUCTURAL_RESERVED, substitution)
    } else {
        value.to_string()
    }
}

/// Check whether a span's content is an alternation group.
pub fn is_alternation(content: &str) -> bool {
    scanner::contains_top_level(content, ALTERNATION_SEPARATOR)
}

fn resolve_text(
    text: &str,
    context: &ResolveContext<'_>,
    kind: LinkKind,
    errors: &mut Vec<PropertyError>,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in scanner::Scanner::new(text) {
        out.push_str(&text[cursor..span.start]);
        out.push_str(&resolve_span(&span, context, kind, errors));
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

fn resolve_span(
    span: &Span,
    context: &ResolveContext<'_>,
    kind: LinkKind,
    errors: &mut Vec<PropertyError>,
) -> String {
    if is_alternation(&span.content) {
        return span.matched.clone();
    }

    // Inside-out: the key is whatever the nested placeholders resolve to.
    // Keys are never sanitized; only the final value is.
    let key = if span.content.contains(OPEN) {
        resolve_text(&span.content, context, LinkKind::Address, errors)
    } else {
        span.content.clone()
    };
    let echo = || {
        if key == span.content {
            span.matched.clone()
        } else {
            format!("{OPEN}{key}}}")
        }
    };

    if let Some(property) = key.strip_prefix(PROPERTY_PREFIX) {
        return match context.properties.lookup(property) {
            PropertyLookup::Found(value) => {
                trace!(property, "resolved document property");
                sanitize(&value.to_string(), kind, context.substitution)
            }
            PropertyLookup::Missing => {
                let document = context.properties.document_name().map(str::to_string);
                warn!(property, document = ?document, "property not found");
                errors.push(PropertyError {
                    property: property.to_string(),
                    document,
                });
                String::new()
            }
            PropertyLookup::NoMetadata | PropertyLookup::NotStructural => echo(),
        };
    }

    match context.dictionary.get(&key) {
        Some(value) => sanitize(value, kind, context.substitution),
        None => {
            trace!(key = %key, "unknown key left as-is");
            echo()
        }
    }
}
