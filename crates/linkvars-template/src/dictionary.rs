/*
 * dictionary.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Key/value dictionaries and per-profile merging.
//!
//! Keys are case-insensitive: every dictionary is indexed by the lower-cased
//! key while keeping the casing it was last written with. The same
//! normalization applies to defaults, profile overrides and lookups, so a
//! default `Dev` and an override `DEV` always name the same entry.

use indexmap::IndexMap;
use tracing::trace;

/// Value marking a key as ignored on one profile.
///
/// Compared by exact equality. A key whose effective value is this sentinel
/// is removed from the active dictionary.
pub const SUPPRESSED: &str = "__IGNORE__";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: String,
    value: String,
}

/// An ordered, case-insensitive string dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: IndexMap<String, Entry>,
}

fn normalize(key: &str) -> String {
    key.to_lowercase()
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, returning the previous value.
    ///
    /// Replacing keeps the entry's position and takes the new casing.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let entry = Entry {
            value: value.into(),
            key: key.clone(),
        };
        self.entries
            .insert(normalize(&key), entry)
            .map(|previous| previous.value)
    }

    /// Look up a value, case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&normalize(key)).map(|e| e.value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize(key))
    }

    /// Remove an entry, preserving the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries
            .shift_remove(&normalize(key))
            .map(|e| e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|e| (e.key.as_str(), e.value.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.key.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dictionary = Dictionary::new();
        dictionary.extend(iter);
        dictionary
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Dictionary {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Build the dictionary active on one profile.
///
/// Starts from `defaults`, overlays every entry of `profile_override`
/// (the override wins), then drops every key whose value is [`SUPPRESSED`].
/// A dropped key behaves exactly like a key that was never defined.
pub fn active_dictionary(defaults: &Dictionary, profile_override: Option<&Dictionary>) -> Dictionary {
    let mut merged = defaults.clone();
    if let Some(overrides) = profile_override {
        merged.extend(overrides.iter());
    }
    merged.entries.retain(|_, entry| {
        let keep = entry.value != SUPPRESSED;
        if !keep {
            trace!(key = %entry.key, "dropping ignored key from active dictionary");
        }
        keep
    });
    merged
}

/// Check whether `key` is ignored by `profile_override`.
pub fn is_suppressed(key: &str, profile_override: Option<&Dictionary>) -> bool {
    profile_override
        .and_then(|overrides| overrides.get(key))
        .is_some_and(|value| value == SUPPRESSED)
}

/// Every key ignored by `profile_override`, in override order.
pub fn suppressed_keys(profile_override: Option<&Dictionary>) -> Vec<String> {
    profile_override
        .map(|overrides| {
            overrides
                .iter()
                .filter(|(_, value)| *value == SUPPRESSED)
                .map(|(key, _)| key.to_string())
                .collect()
        })
        .unwrap_or_default()
}
