//! Command implementations for the linkvars CLI
//!
//! Each command loads the settings, picks the device profile, and delegates
//! to linkvars-template for the actual resolution.

pub mod check;
pub mod expand;
pub mod open;
pub mod resolve;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use linkvars_config::{ProfileContext, Settings};
use linkvars_template::{DocumentProperties, LinkKind, NoDocument, PropertySource};

use crate::document;

/// Settings file looked up in the current directory when `--config` is absent.
pub const DEFAULT_SETTINGS_FILE: &str = "linkvars.yml";

/// Options shared by every command
#[derive(Debug, Default)]
pub struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub profile: Option<String>,
    pub vault: Option<PathBuf>,
}

/// The template and where it is used
#[derive(Debug, Args)]
pub struct LinkArgs {
    /// Link template, e.g. '${SERVER1,,SERVER2}/status'
    pub template: String,

    /// Document whose frontmatter supplies ${L:...} properties
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Treat the template as an external address (no character substitution)
    #[arg(short, long)]
    pub address: bool,
}

impl LinkArgs {
    pub fn kind(&self) -> LinkKind {
        if self.address {
            LinkKind::Address
        } else {
            LinkKind::Structural
        }
    }

    /// Load the referenced document, if any.
    pub fn load_document(&self) -> Result<Option<DocumentProperties>> {
        self.document
            .as_deref()
            .map(document::load_document)
            .transpose()
    }
}

/// Borrow a property source for an optional document.
pub fn properties(document: Option<&DocumentProperties>) -> &dyn PropertySource {
    match document {
        Some(document) => document,
        None => &NoDocument,
    }
}

/// Load the settings named by `--config`, or the default file when present.
pub fn load_settings(global: &GlobalArgs) -> Result<Settings> {
    match &global.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => {
            let default = Path::new(DEFAULT_SETTINGS_FILE);
            if default.exists() {
                Settings::load(default).context("Failed to load ./linkvars.yml")
            } else {
                debug!("no settings file, using defaults");
                Ok(Settings::default())
            }
        }
    }
}

/// Pick the profile and build the engine inputs.
pub fn profile_context(global: &GlobalArgs, settings: &Settings) -> Result<ProfileContext> {
    let vault = match &global.vault {
        Some(vault) => Some(vault.clone()),
        None => std::env::current_dir().ok(),
    };
    let profile = settings.select_profile(global.profile.as_deref(), vault.as_deref())?;
    match profile {
        Some(profile) => debug!(profile = %profile.name, "using device profile"),
        None => debug!("no device profile matched, using defaults"),
    }
    Ok(settings.context(profile))
}

/// Load settings and build the context in one step.
pub fn load_context(global: &GlobalArgs) -> Result<ProfileContext> {
    let settings = load_settings(global)?;
    profile_context(global, &settings)
}
