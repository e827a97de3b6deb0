//! Device profiles and dictionary settings for linkvars.
//!
//! This crate owns the settings file: the default dictionary, per-key route
//! preferences, and the list of device profiles that override defaults on
//! one machine. It turns those settings into the inputs of the template
//! engine for whichever profile is active.
//!
//! # Key Features
//!
//! - **Edit-time validation**: keys never contain `:` or `,`, and no key
//!   disables both presentation channels
//! - **One normalization policy**: keys are compared case-insensitively
//!   everywhere (defaults, overrides, preferences)
//! - **Profile selection**: by name, or by the vault path of the current device
//!
//! # Example
//!
//! ```rust,no_run
//! use linkvars_config::Settings;
//! use linkvars_template::{Environment, LinkKind, NoDocument};
//! use std::path::Path;
//!
//! let settings = Settings::load(Path::new("linkvars.yml"))?;
//! let profile = settings.select_profile(None, Some(Path::new("/home/me/vault")))?;
//! let context = settings.context(profile);
//!
//! let invoker = context.invoker(&NoDocument, Environment::default());
//! let invocation = invoker.invoke("${SERVER1,,SERVER2}/status", LinkKind::Address);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod context;
mod edit;
mod load;
mod types;

pub use context::ProfileContext;

pub use edit::validate_key;

pub use types::{
    ConfigError,
    ConfigResult,
    DeviceProfile,
    Settings,
};
