/*
 * invoke.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Turning a link template into something to open.
//!
//! [`Invoker::invoke`] decides, without side effects, whether a template
//! yields one target or a choice between several. [`follow`] hands that
//! decision to a [`Navigator`], the collaborator that actually opens links,
//! asks the user, and shows notices.
//!
//! Navigation is all-or-nothing: when an invocation fails, nothing is opened.

use crate::dictionary::{self, Dictionary};
use crate::error::{InvokeError, InvokeResult, PropertyError};
use crate::expander::{self, Candidate};
use crate::preference::{Channel, PreferenceTable, merged_preference};
use crate::resolver::{LinkKind, ResolveContext, resolve};
use serde::Serialize;
use tracing::{debug, warn};

/// Prefix that wraps address templates so the host treats them as links.
/// Stripped from resolved address targets.
pub const ADDRESS_SCHEME: &str = "dummy://";

/// Capabilities of the runtime the links are opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    /// Whether the rich (embedded) channel can be used at all.
    pub rich_available: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            rich_available: true,
        }
    }
}

/// A resolved link ready to be opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub label: String,
    pub display: String,
    /// The resolved link text.
    pub value: String,
    /// Dictionary keys the value was built from.
    pub keys: Vec<String>,
    /// Channels to offer, in order of preference. Empty for structural links.
    pub channels: Vec<Channel>,
}

/// Several targets for the user to pick from, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceRequest {
    pub template: String,
    pub options: Vec<Target>,
}

/// What a template invocation produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Invocation {
    Single(Target),
    Choice(ChoiceRequest),
}

/// Resolves templates against one profile.
#[derive(Debug, Clone, Copy)]
pub struct Invoker<'a> {
    context: ResolveContext<'a>,
    profile_override: Option<&'a Dictionary>,
    preferences: &'a PreferenceTable,
    environment: Environment,
}

impl<'a> Invoker<'a> {
    pub fn new(context: ResolveContext<'a>, preferences: &'a PreferenceTable) -> Self {
        Self {
            context,
            profile_override: None,
            preferences,
            environment: Environment::default(),
        }
    }

    /// Set the raw overrides of the active profile, used to find ignored keys.
    pub fn with_profile_override(mut self, overrides: Option<&'a Dictionary>) -> Self {
        self.profile_override = overrides;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Resolve `template` into a single target or a choice request.
    pub fn invoke(&self, template: &str, kind: LinkKind) -> InvokeResult<Invocation> {
        if expander::has_alternation(template) {
            self.invoke_alternation(template, kind)
        } else {
            self.invoke_plain(template, kind)
        }
    }

    fn invoke_plain(&self, template: &str, kind: LinkKind) -> InvokeResult<Invocation> {
        let resolution = resolve(template, &self.context, kind);
        if !resolution.is_ok() {
            warn!(template, "property resolution failed");
            return Err(InvokeError::PropertyResolutionFailed {
                errors: resolution.property_errors,
            });
        }
        let keys = expander::referenced_keys(template);
        Ok(Invocation::Single(self.target(
            template.to_string(),
            resolution.text.clone(),
            resolution.text,
            keys,
            kind,
        )))
    }

    fn invoke_alternation(&self, template: &str, kind: LinkKind) -> InvokeResult<Invocation> {
        let candidates = expander::expand(template, &self.context, kind);
        let total = candidates.len();

        let mut suppressed_keys: Vec<String> = Vec::new();
        let mut property_errors: Vec<PropertyError> = Vec::new();
        let mut surviving: Vec<Candidate> = Vec::new();
        for candidate in candidates {
            let ignored: Vec<&String> = candidate
                .keys
                .iter()
                .filter(|key| dictionary::is_suppressed(key, self.profile_override))
                .collect();
            if !ignored.is_empty() {
                debug!(label = %candidate.label, "candidate uses an ignored key");
                for key in ignored {
                    let lower = key.to_lowercase();
                    if !suppressed_keys.iter().any(|k| k.to_lowercase() == lower) {
                        suppressed_keys.push(key.clone());
                    }
                }
                continue;
            }
            for error in &candidate.property_errors {
                if !property_errors.contains(error) {
                    property_errors.push(error.clone());
                }
            }
            surviving.push(candidate);
        }
        debug!(total, surviving = surviving.len(), "filtered candidates");

        // A missing property fails the whole invocation, even when other
        // options resolved.
        if !property_errors.is_empty() {
            warn!(template, "property resolution failed");
            return Err(InvokeError::PropertyResolutionFailed {
                errors: property_errors,
            });
        }
        if surviving.is_empty() {
            warn!(template, "all options ignored on this profile");
            return Err(InvokeError::AllOptionsSuppressed {
                template: template.to_string(),
                keys: suppressed_keys,
            });
        }

        let mut targets: Vec<Target> = surviving
            .into_iter()
            .map(|c| self.target(c.label, c.display, c.value, c.keys, kind))
            .collect();

        if targets.len() == 1 {
            return Ok(Invocation::Single(targets.remove(0)));
        }
        Ok(Invocation::Choice(ChoiceRequest {
            template: template.to_string(),
            options: targets,
        }))
    }

    fn target(
        &self,
        label: String,
        display: String,
        value: String,
        keys: Vec<String>,
        kind: LinkKind,
    ) -> Target {
        let (value, channels) = match kind {
            LinkKind::Structural => (value, Vec::new()),
            LinkKind::Address => {
                let value = match value.strip_prefix(ADDRESS_SCHEME) {
                    Some(stripped) => stripped.to_string(),
                    None => value,
                };
                (value, self.channels(&keys))
            }
        };
        Target {
            label,
            display,
            value,
            keys,
            channels,
        }
    }

    /// Channels to offer for an address built from `keys`.
    ///
    /// At least one channel is always offered: `plain` is the fallback when
    /// the environment has no rich channel or the merged preference
    /// disables both.
    pub fn channels(&self, keys: &[String]) -> Vec<Channel> {
        let preference = merged_preference(keys.iter().map(String::as_str), self.preferences);
        let mut channels = Vec::with_capacity(2);
        if preference.rich && self.environment.rich_available {
            channels.push(Channel::Rich);
        }
        if preference.plain || channels.is_empty() {
            channels.push(Channel::Plain);
        }
        channels
    }
}

/// The collaborator that opens links and talks to the user.
pub trait Navigator {
    /// Open a reference into the host's own document space.
    fn open_structural(&mut self, target: &Target);

    /// Open an external address on `channel`.
    fn open_address(&mut self, target: &Target, channel: Channel);

    /// Ask the user to pick one option. `None` cancels.
    fn choose(&mut self, request: &ChoiceRequest) -> Option<usize>;

    /// Pick the channel for an address. Defaults to the first offered.
    fn choose_channel(&mut self, target: &Target) -> Option<Channel> {
        target.channels.first().copied()
    }

    /// Show a dismissible notice about a failed invocation.
    fn notify(&mut self, error: &InvokeError);
}

/// What [`follow`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Opened(Target),
    Cancelled,
    Failed(InvokeError),
}

/// Invoke `template` and carry the result out through `navigator`.
pub fn follow<N: Navigator + ?Sized>(
    invoker: &Invoker<'_>,
    navigator: &mut N,
    template: &str,
    kind: LinkKind,
) -> Outcome {
    let target = match invoker.invoke(template, kind) {
        Err(error) => {
            navigator.notify(&error);
            return Outcome::Failed(error);
        }
        Ok(Invocation::Single(target)) => target,
        Ok(Invocation::Choice(mut request)) => match navigator.choose(&request) {
            Some(index) if index < request.options.len() => request.options.swap_remove(index),
            _ => return Outcome::Cancelled,
        },
    };

    match kind {
        LinkKind::Structural => navigator.open_structural(&target),
        LinkKind::Address => match navigator.choose_channel(&target) {
            Some(channel) => navigator.open_address(&target, channel),
            None => return Outcome::Cancelled,
        },
    }
    Outcome::Opened(target)
}
