/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Placeholder expansion engine for profile-aware link templates.
//!
//! A link template is plain text with `${...}` placeholders:
//!
//! - Dictionary lookup: `${KEY}` (case-insensitive)
//! - Document property: `${L:property}`
//! - Alternation: `${A,,B,,C}`, bare words are sugar for `${A}`
//! - Nesting: `${${KEY}suffix,,literal}`, `${L:${FIELD}}`
//!
//! # Architecture
//!
//! The engine is **independent of any storage or UI**. The host supplies the
//! active [`Dictionary`] (see [`active_dictionary`] for per-profile merging),
//! a [`PropertySource`] for the current document, and a [`PreferenceTable`].
//! Results go back through plain values ([`Resolution`], [`Candidate`],
//! [`Invocation`]) or through a [`Navigator`] the host implements.
//!
//! # Example
//!
//! ```
//! use linkvars_template::{Dictionary, LinkKind, ResolveContext, expand};
//!
//! let dict: Dictionary = [
//!     ("SERVER1", "https://server1.com"),
//!     ("SERVER2", "https://server2.com"),
//!     ("API", "/api"),
//! ]
//! .into_iter()
//! .collect();
//! let ctx = ResolveContext::new(&dict);
//!
//! let candidates = expand("${SERVER1,,SERVER2}${API}/status", &ctx, LinkKind::Address);
//! assert_eq!(candidates[1].value, "https://server2.com/api/status");
//! ```

pub mod dictionary;
pub mod error;
pub mod expander;
pub mod invoke;
pub mod preference;
pub mod resolver;
pub mod scanner;
pub mod value;

// Re-export main types at crate root
pub use dictionary::{Dictionary, SUPPRESSED, active_dictionary, is_suppressed, suppressed_keys};
pub use error::{InvokeError, InvokeResult, PropertyError};
pub use expander::{Candidate, expand, extract_balanced_patterns, has_alternation};
pub use invoke::{
    ADDRESS_SCHEME, ChoiceRequest, Environment, Invocation, Invoker, Navigator, Outcome, Target,
    follow,
};
pub use preference::{Channel, PreferenceTable, RoutePreference, merged_preference};
pub use resolver::{LinkKind, ResolveContext, Resolution, resolve, sanitize};
pub use scanner::{Span, scan};
pub use value::{
    DocumentProperties, NoDocument, PropertyLookup, PropertyMap, PropertySource, PropertyValue,
};
