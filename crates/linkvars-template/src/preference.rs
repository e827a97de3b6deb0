/*
 * preference.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Per-key route preferences.
//!
//! An address can be offered on two presentation channels. Each dictionary
//! key may restrict which channels are used for addresses built from it;
//! when a candidate touches several keys the most restrictive wins.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A presentation channel for address links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Opened inside the host (embedded viewer). Not available everywhere.
    Rich,
    /// Handed to the system (default browser / file manager).
    Plain,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Rich => f.write_str("rich"),
            Channel::Plain => f.write_str("plain"),
        }
    }
}

/// Which channels a key may be offered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutePreference {
    pub rich: bool,
    pub plain: bool,
}

impl Default for RoutePreference {
    fn default() -> Self {
        Self::ALL
    }
}

impl RoutePreference {
    /// Both channels enabled.
    pub const ALL: RoutePreference = RoutePreference {
        rich: true,
        plain: true,
    };

    pub fn new(rich: bool, plain: bool) -> Self {
        Self { rich, plain }
    }

    /// Channel-wise AND.
    pub fn and(self, other: RoutePreference) -> RoutePreference {
        RoutePreference {
            rich: self.rich && other.rich,
            plain: self.plain && other.plain,
        }
    }

    pub fn allows(self, channel: Channel) -> bool {
        match channel {
            Channel::Rich => self.rich,
            Channel::Plain => self.plain,
        }
    }

    /// True when no channel is enabled.
    pub fn is_empty(self) -> bool {
        !self.rich && !self.plain
    }
}

/// Stored route preferences, looked up case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceTable {
    entries: IndexMap<String, (String, RoutePreference)>,
}

impl PreferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, preference: RoutePreference) {
        let key = key.into();
        self.entries
            .insert(key.to_lowercase(), (key, preference));
    }

    /// The stored preference for `key`, if one was set.
    pub fn explicit(&self, key: &str) -> Option<RoutePreference> {
        self.entries.get(&key.to_lowercase()).map(|(_, p)| *p)
    }

    /// The preference for `key`, defaulting to [`RoutePreference::ALL`].
    pub fn get(&self, key: &str) -> RoutePreference {
        self.explicit(key).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, RoutePreference)> {
        self.entries.values().map(|(k, p)| (k.as_str(), *p))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, RoutePreference)> for PreferenceTable {
    fn from_iter<I: IntoIterator<Item = (K, RoutePreference)>>(iter: I) -> Self {
        let mut table = PreferenceTable::new();
        for (key, preference) in iter {
            table.set(key, preference);
        }
        table
    }
}

/// Merge the preferences of every key a candidate references.
///
/// Starts from both channels enabled and ANDs in each key's preference, so
/// the result is the most restrictive combination. Merging can yield a
/// preference with no channel; choosing what to offer then is up to the
/// caller (see [`crate::invoke`]).
pub fn merged_preference<'k>(
    keys: impl IntoIterator<Item = &'k str>,
    table: &PreferenceTable,
) -> RoutePreference {
    keys.into_iter()
        .fold(RoutePreference::ALL, |acc, key| acc.and(table.get(key)))
}
