/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template resolution and invocation.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A `${L:property}` reference that the active document's metadata lacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyError {
    pub property: String,
    pub document: Option<String>,
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.document {
            Some(document) => write!(f, "'{}' in {}", self.property, document),
            None => write!(f, "'{}'", self.property),
        }
    }
}

/// Errors that stop an invocation. Nothing is navigated when one occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    /// A referenced document property does not exist.
    #[error("Property not found: {}", join(.errors))]
    PropertyResolutionFailed { errors: Vec<PropertyError> },

    /// Every alternative references a key ignored on the active profile.
    #[error("All options of '{template}' are ignored on this device ({})", .keys.join(", "))]
    AllOptionsSuppressed { template: String, keys: Vec<String> },
}

fn join(errors: &[PropertyError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for invocations.
pub type InvokeResult<T> = Result<T, InvokeError>;
