/*
 * resolve.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Resolve command implementation
 */

//! Resolve command implementation.
//!
//! Prints the template with every placeholder resolved. Alternation groups
//! are left as written; use `expand` or `open` for those.

use std::io::Write;

use anyhow::Result;
use linkvars_template::{InvokeError, resolve};
use tracing::debug;

use super::{GlobalArgs, LinkArgs, load_context, properties};

/// Execute the resolve command
pub fn execute(global: &GlobalArgs, args: &LinkArgs, out: &mut impl Write) -> Result<()> {
    let context = load_context(global)?;
    let document = args.load_document()?;
    let ctx = context.resolve_context(properties(document.as_ref()));

    let resolution = resolve(&args.template, &ctx, args.kind());
    debug!(template = %args.template, resolved = %resolution.text, "resolved");
    if !resolution.is_ok() {
        return Err(InvokeError::PropertyResolutionFailed {
            errors: resolution.property_errors,
        }
        .into());
    }

    writeln!(out, "{}", resolution.text)?;
    Ok(())
}
