/*
 * frontmatter.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Front matter parsing for source documents.
 */

//! Front matter parsing.
//!
//! Front matter carries document presentation settings (title, math,
//! citations, thumbnail) and the declared export entries the resolver
//! turns into jobs. Parsing is permissive: missing or malformed fields
//! fall back to defaults, matching how declared configuration behaves
//! elsewhere in the pipeline.

use std::path::PathBuf;

use crate::error::{ExportError, Result};
use crate::format::ExportFormat;

/// Math rendering settings from front matter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MathSettings {
    /// Whether math rendering is enabled
    pub enabled: bool,
    /// Optional math renderer name (e.g. "katex")
    pub renderer: Option<String>,
}

/// Citation settings from front matter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitationSettings {
    /// Citation style identifier or CSL path
    pub style: Option<String>,
    /// Bibliography database path
    pub bibliography: Option<PathBuf>,
}

/// One export entry as declared in front matter.
///
/// Declared entries are intent, not validated jobs: paths are unresolved
/// and the articles list may be absent. The resolver turns entries into
/// [`crate::resolve::ExportJob`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportEntry {
    /// Target format
    pub format: ExportFormat,
    /// Declared output path (resolved relative to the source directory)
    pub output: Option<PathBuf>,
    /// Declared template path or identifier
    pub template: Option<String>,
    /// Article source paths; `None` defaults to the source file itself
    pub articles: Option<Vec<PathBuf>>,
    /// Sub-article source paths
    pub sub_articles: Vec<PathBuf>,
    /// Renderer-specific options bag
    pub options: serde_json::Value,
}

impl ExportEntry {
    /// Create a default entry for a format, used when `force` synthesizes
    /// an export with nothing declared.
    pub fn default_for(format: ExportFormat) -> Self {
        Self {
            format,
            output: None,
            template: None,
            articles: None,
            sub_articles: Vec::new(),
            options: serde_json::Value::Null,
        }
    }
}

/// Parsed document front matter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    /// Document title
    pub title: Option<String>,
    /// Whether the document body already contains its title
    pub content_includes_title: bool,
    /// Math settings
    pub math: MathSettings,
    /// Citation settings
    pub citations: CitationSettings,
    /// Thumbnail image path
    pub thumbnail: Option<PathBuf>,
    /// Declared export entries
    pub exports: Vec<ExportEntry>,
    /// Raw front matter value for renderer-specific settings
    pub raw: serde_json::Value,
}

impl FrontMatter {
    /// An empty front matter with all defaults.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse front matter from YAML text.
    pub fn parse(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_yaml::from_str(content)
            .map_err(|e| ExportError::Other(format!("Failed to parse front matter: {}", e)))?;
        Ok(Self::from_value(value))
    }

    /// Extract front matter fields from a YAML-derived value.
    pub fn from_value(value: serde_json::Value) -> Self {
        let title = value
            .get("title")
            .and_then(|v| v.as_str())
            .map(String::from);

        let content_includes_title = value
            .get("title-in-content")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        // `math: true`, `math: false`, or `math: <renderer name>`
        let math = match value.get("math") {
            Some(serde_json::Value::Bool(enabled)) => MathSettings {
                enabled: *enabled,
                renderer: None,
            },
            Some(serde_json::Value::String(renderer)) => MathSettings {
                enabled: true,
                renderer: Some(renderer.clone()),
            },
            _ => MathSettings::default(),
        };

        let citations = value
            .get("citations")
            .map(|c| CitationSettings {
                style: c.get("csl").and_then(|v| v.as_str()).map(String::from),
                bibliography: c
                    .get("bibliography")
                    .and_then(|v| v.as_str())
                    .map(PathBuf::from),
            })
            .unwrap_or_default();

        let thumbnail = value
            .get("thumbnail")
            .and_then(|v| v.as_str())
            .map(PathBuf::from);

        let exports = parse_export_entries(&value);

        Self {
            title,
            content_includes_title,
            math,
            citations,
            thumbnail,
            exports,
            raw: value,
        }
    }
}

/// Parse the `export` list from a YAML-derived value.
///
/// Entries without a recognizable format are skipped; declared
/// configuration is permissive here and validation happens in the
/// resolver, where diagnostics can be attached to the source file.
pub fn parse_export_entries(value: &serde_json::Value) -> Vec<ExportEntry> {
    let Some(entries) = value.get("export").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let format = entry
                .get("format")
                .and_then(|v| v.as_str())
                .and_then(|s| ExportFormat::try_from(s).ok())?;

            let output = entry
                .get("output")
                .and_then(|v| v.as_str())
                .map(PathBuf::from);

            let template = entry
                .get("template")
                .and_then(|v| v.as_str())
                .map(String::from);

            let articles = entry.get("articles").and_then(|v| v.as_array()).map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(PathBuf::from))
                    .collect()
            });

            let sub_articles = entry
                .get("sub-articles")
                .and_then(|v| v.as_array())
                .map(|arr| {
                    arr.iter()
                        .filter_map(|v| v.as_str().map(PathBuf::from))
                        .collect()
                })
                .unwrap_or_default();

            let options = entry
                .get("options")
                .cloned()
                .unwrap_or(serde_json::Value::Null);

            Some(ExportEntry {
                format,
                output,
                template,
                articles,
                sub_articles,
                options,
            })
        })
        .collect()
}
