//! Profile selection and engine inputs.

use crate::types::{ConfigError, ConfigResult, DeviceProfile, Settings};
use linkvars_template::{
    Dictionary, Environment, Invoker, PreferenceTable, PropertySource, ResolveContext,
    active_dictionary,
};
use std::path::Path;
use tracing::debug;

/// Everything the template engine needs for one profile, owned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileContext {
    /// Name of the active profile, if any.
    pub profile: Option<String>,

    /// Defaults merged with the profile's overrides, ignored keys removed.
    pub dictionary: Dictionary,

    /// The profile's raw overrides, still holding ignore sentinels.
    pub overrides: Option<Dictionary>,

    pub preferences: PreferenceTable,

    pub substitution: String,
}

impl ProfileContext {
    /// Borrow a resolution context reading properties from `properties`.
    pub fn resolve_context<'a>(&'a self, properties: &'a dyn PropertySource) -> ResolveContext<'a> {
        ResolveContext::new(&self.dictionary)
            .with_properties(properties)
            .with_substitution(&self.substitution)
    }

    /// Borrow an invoker for this profile.
    pub fn invoker<'a>(
        &'a self,
        properties: &'a dyn PropertySource,
        environment: Environment,
    ) -> Invoker<'a> {
        Invoker::new(self.resolve_context(properties), &self.preferences)
            .with_profile_override(self.overrides.as_ref())
            .with_environment(environment)
    }
}

impl Settings {
    /// Find a profile by exact name.
    pub fn profile(&self, name: &str) -> Option<&DeviceProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Find the profile registered for the vault at `vault`.
    pub fn profile_for_path(&self, vault: &Path) -> Option<&DeviceProfile> {
        self.profiles
            .iter()
            .find(|p| p.path.as_deref().is_some_and(|path| path == vault))
    }

    /// Pick the active profile.
    ///
    /// An explicit name must exist. Without one, the profile whose path is
    /// `vault` is used; no match means defaults only.
    pub fn select_profile(
        &self,
        name: Option<&str>,
        vault: Option<&Path>,
    ) -> ConfigResult<Option<&DeviceProfile>> {
        if let Some(name) = name {
            return self
                .profile(name)
                .map(Some)
                .ok_or_else(|| ConfigError::UnknownProfile {
                    name: name.to_string(),
                });
        }
        Ok(vault.and_then(|vault| self.profile_for_path(vault)))
    }

    /// Build the engine inputs for `profile` (or for defaults only).
    pub fn context(&self, profile: Option<&DeviceProfile>) -> ProfileContext {
        let defaults: Dictionary = self.defaults.iter().collect();
        let overrides: Option<Dictionary> = profile.map(|p| p.overrides.iter().collect());
        let dictionary = active_dictionary(&defaults, overrides.as_ref());
        debug!(
            profile = profile.map(|p| p.name.as_str()),
            keys = dictionary.len(),
            "built active dictionary"
        );
        ProfileContext {
            profile: profile.map(|p| p.name.clone()),
            dictionary,
            overrides,
            preferences: self.preferences.iter().map(|(k, v)| (k.as_str(), *v)).collect(),
            substitution: self.substitution.clone(),
        }
    }
}
