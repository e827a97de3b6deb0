//! Check command implementation.
//!
//! Loads and validates the settings, then shows what the active profile
//! resolves keys to.

use std::io::Write;

use anyhow::Result;
use linkvars_template::{Channel, RoutePreference, suppressed_keys};

use super::{GlobalArgs, load_settings, profile_context};

/// Execute the check command
pub fn execute(global: &GlobalArgs, out: &mut impl Write) -> Result<()> {
    let settings = load_settings(global)?;
    settings.validate()?;
    let context = profile_context(global, &settings)?;

    writeln!(
        out,
        "profile: {}",
        context.profile.as_deref().unwrap_or("(defaults)")
    )?;
    for (key, value) in context.dictionary.iter() {
        writeln!(out, "{key} = {value}")?;
    }

    let ignored = suppressed_keys(context.overrides.as_ref());
    if !ignored.is_empty() {
        writeln!(out, "ignored: {}", ignored.join(", "))?;
    }

    for (key, preference) in context.preferences.iter() {
        writeln!(out, "{key}: {}", channels(preference))?;
    }
    Ok(())
}

fn channels(preference: RoutePreference) -> String {
    let allowed: Vec<String> = [Channel::Rich, Channel::Plain]
        .into_iter()
        .filter(|channel| preference.allows(*channel))
        .map(|channel| channel.to_string())
        .collect();
    if allowed.is_empty() {
        "none".to_string()
    } else {
        allowed.join(", ")
    }
}
