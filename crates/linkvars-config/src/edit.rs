//! Validation and edit operations.
//!
//! Every mutation goes through the same key checks, so a settings value that
//! was only ever edited through these methods always passes
//! [`Settings::validate`].

use crate::types::{ConfigError, ConfigResult, DeviceProfile, Settings};
use indexmap::IndexMap;
use linkvars_template::{RoutePreference, SUPPRESSED};
use tracing::debug;

/// Characters a dictionary key may not contain.
const RESERVED: [char; 2] = [':', ','];

/// Check that `key` can be used as a dictionary key.
pub fn validate_key(key: &str) -> ConfigResult<()> {
    if key.is_empty() {
        return Err(ConfigError::EmptyKey);
    }
    if let Some(character) = key.chars().find(|c| RESERVED.contains(c)) {
        return Err(ConfigError::ReservedCharacter {
            key: key.to_string(),
            character,
        });
    }
    Ok(())
}

fn validate_keys<'a, V>(map: &'a IndexMap<String, V>) -> ConfigResult<()> {
    let mut seen: IndexMap<String, &'a str> = IndexMap::new();
    for key in map.keys() {
        validate_key(key)?;
        if let Some(existing) = seen.insert(key.to_lowercase(), key.as_str()) {
            return Err(ConfigError::DuplicateKey {
                key: key.clone(),
                existing: existing.to_string(),
            });
        }
    }
    Ok(())
}

fn validate_preference(key: &str, preference: RoutePreference) -> ConfigResult<()> {
    if preference.is_empty() {
        return Err(ConfigError::NoChannel {
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Insert `key`, replacing any entry that differs only in case.
fn insert_normalized<V>(map: &mut IndexMap<String, V>, key: &str, value: V) {
    let lower = key.to_lowercase();
    match map.keys().position(|k| k.to_lowercase() == lower) {
        Some(index) => {
            map.shift_remove_index(index);
            map.shift_insert(index, key.to_string(), value);
        }
        None => {
            map.insert(key.to_string(), value);
        }
    }
}

fn remove_normalized<V>(map: &mut IndexMap<String, V>, key: &str) -> Option<V> {
    let lower = key.to_lowercase();
    let index = map.keys().position(|k| k.to_lowercase() == lower)?;
    map.shift_remove_index(index).map(|(_, v)| v)
}

impl Settings {
    /// Check every edit-time invariant.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_keys(&self.defaults)?;
        validate_keys(&self.preferences)?;
        for (key, preference) in &self.preferences {
            validate_preference(key, *preference)?;
        }

        let mut names: Vec<&str> = Vec::new();
        for profile in &self.profiles {
            if profile.name.is_empty() {
                return Err(ConfigError::EmptyProfileName);
            }
            if names.contains(&profile.name.as_str()) {
                return Err(ConfigError::DuplicateProfile {
                    name: profile.name.clone(),
                });
            }
            names.push(&profile.name);
            validate_keys(&profile.overrides)?;
        }
        Ok(())
    }

    /// Set a default value.
    pub fn set_default(&mut self, key: &str, value: impl Into<String>) -> ConfigResult<()> {
        validate_key(key)?;
        insert_normalized(&mut self.defaults, key, value.into());
        debug!(key, "default set");
        Ok(())
    }

    /// Remove a default value, along with its overrides and preference.
    pub fn remove_default(&mut self, key: &str) -> Option<String> {
        let removed = remove_normalized(&mut self.defaults, key);
        if removed.is_some() {
            remove_normalized(&mut self.preferences, key);
            for profile in &mut self.profiles {
                remove_normalized(&mut profile.overrides, key);
            }
        }
        removed
    }

    /// Override `key` on one profile.
    pub fn set_override(
        &mut self,
        profile: &str,
        key: &str,
        value: impl Into<String>,
    ) -> ConfigResult<()> {
        validate_key(key)?;
        let profile = self.profile_mut(profile)?;
        insert_normalized(&mut profile.overrides, key, value.into());
        Ok(())
    }

    /// Hide `key` on one profile.
    pub fn ignore_on(&mut self, profile: &str, key: &str) -> ConfigResult<()> {
        self.set_override(profile, key, SUPPRESSED)
    }

    /// Drop a profile's override so the default applies again.
    pub fn clear_override(&mut self, profile: &str, key: &str) -> ConfigResult<Option<String>> {
        let profile = self.profile_mut(profile)?;
        Ok(remove_normalized(&mut profile.overrides, key))
    }

    /// Restrict the channels used for addresses built from `key`.
    pub fn set_preference(&mut self, key: &str, preference: RoutePreference) -> ConfigResult<()> {
        validate_key(key)?;
        validate_preference(key, preference)?;
        insert_normalized(&mut self.preferences, key, preference);
        Ok(())
    }

    pub fn add_profile(&mut self, profile: DeviceProfile) -> ConfigResult<()> {
        if profile.name.is_empty() {
            return Err(ConfigError::EmptyProfileName);
        }
        if self.profile(&profile.name).is_some() {
            return Err(ConfigError::DuplicateProfile { name: profile.name });
        }
        validate_keys(&profile.overrides)?;
        self.profiles.push(profile);
        Ok(())
    }

    pub fn remove_profile(&mut self, name: &str) -> ConfigResult<DeviceProfile> {
        let index = self
            .profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                name: name.to_string(),
            })?;
        Ok(self.profiles.remove(index))
    }

    fn profile_mut(&mut self, name: &str) -> ConfigResult<&mut DeviceProfile> {
        self.profiles
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                name: name.to_string(),
            })
    }
}
