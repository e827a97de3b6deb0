//! Expand command implementation.
//!
//! Lists every alternative of a template in enumeration order, marking the
//! ones that use a key ignored on the active profile.

use std::io::Write;

use anyhow::Result;
use linkvars_template::{expand, is_suppressed};

use super::{GlobalArgs, LinkArgs, load_context, properties};

/// Execute the expand command
pub fn execute(
    global: &GlobalArgs,
    args: &LinkArgs,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let context = load_context(global)?;
    let document = args.load_document()?;
    let ctx = context.resolve_context(properties(document.as_ref()));

    let candidates = expand(&args.template, &ctx, args.kind());

    if json {
        serde_json::to_writer_pretty(&mut *out, &candidates)?;
        writeln!(out)?;
        return Ok(());
    }

    for (i, candidate) in candidates.iter().enumerate() {
        let ignored = candidate
            .keys
            .iter()
            .any(|key| is_suppressed(key, context.overrides.as_ref()));
        write!(out, "{}. {}: {}", i + 1, candidate.label, candidate.value)?;
        if ignored {
            write!(out, " (ignored)")?;
        }
        if !candidate.property_errors.is_empty() {
            write!(out, " (missing property)")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
