/*
 * document.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Reading document metadata for `${L:...}` lookups.
//!
//! Markdown files are structural documents; their leading `---` YAML block is
//! the metadata. A markdown file without that block has no metadata. Any
//! other file type is not a structural document at all.

use std::path::Path;

use anyhow::{Context, Result, bail};
use linkvars_template::{DocumentProperties, PropertyMap, PropertyValue};

const MARKDOWN_EXTENSIONS: [&str; 3] = ["md", "markdown", "qmd"];

/// Load the metadata snapshot of the document at `path`.
pub fn load_document(path: &Path) -> Result<DocumentProperties> {
    let name = path.display().to_string();
    let is_markdown = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
    if !is_markdown {
        return Ok(DocumentProperties::other(name));
    }

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document {}", path.display()))?;
    let metadata = frontmatter(&source)
        .map(parse_metadata)
        .transpose()
        .with_context(|| format!("Invalid frontmatter in {}", path.display()))?;
    Ok(DocumentProperties::structural(name, metadata))
}

/// The YAML between a leading `---` line and the next `---` or `...` line.
pub fn frontmatter(source: &str) -> Option<&str> {
    let mut lines = source.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }
    let start = first.len();
    let mut offset = start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return Some(&source[start..offset]);
        }
        offset += line.len();
    }
    None
}

/// Parse a YAML mapping into document properties.
pub fn parse_metadata(yaml: &str) -> Result<PropertyMap> {
    if yaml.trim().is_empty() {
        return Ok(PropertyMap::new());
    }
    let value: serde_json::Value = serde_yaml::from_str(yaml)?;
    match value {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .map(|(k, v)| (k, PropertyValue::from(v)))
            .collect()),
        serde_json::Value::Null => Ok(PropertyMap::new()),
        _ => bail!("frontmatter must be a mapping"),
    }
}
