/*
 * project.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Project scope for export resolution.
 */

//! Project scope discovery.
//!
//! A project is a directory with a `_folio.yml` configuration file.
//! Project configuration can declare export entries of its own; when the
//! file handed to the resolver *is* the project configuration file, those
//! entries are used instead of document front matter.

use std::path::{Path, PathBuf};

use crate::error::{ExportError, Result};
use crate::frontmatter::{ExportEntry, parse_export_entries};

/// Project configuration file names, in lookup order.
const PROJECT_FILES: [&str; 2] = ["_folio.yml", "_folio.yaml"];

/// Project scope for export resolution
#[derive(Debug, Clone)]
pub struct ProjectScope {
    /// Project root directory
    pub dir: PathBuf,

    /// Path of the project configuration file
    pub config_path: PathBuf,

    /// Export entries declared in the project configuration
    pub exports: Vec<ExportEntry>,

    /// Raw configuration value
    pub raw: serde_json::Value,
}

impl ProjectScope {
    /// Load project configuration from a file.
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        let content = std::fs::read_to_string(config_path)?;

        let raw: serde_json::Value = serde_yaml::from_str(&content).map_err(|e| {
            ExportError::Other(format!(
                "Failed to parse {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let dir = config_path
            .parent()
            .ok_or_else(|| {
                ExportError::other("Project configuration file has no parent directory")
            })?
            .to_path_buf();

        let exports = parse_export_entries(&raw);

        Ok(Self {
            dir,
            config_path: config_path.to_path_buf(),
            exports,
            raw,
        })
    }

    /// Discover a project scope from a path.
    ///
    /// Searches the path's directory and its parents for a `_folio.yml`
    /// (or `_folio.yaml`). Returns `None` when no configuration file is
    /// found, which makes the source file a single-file pseudo-project.
    pub fn discover(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        let start = if path.is_file() {
            path.parent().unwrap_or(Path::new("."))
        } else {
            path
        };

        let mut current = start.to_path_buf();
        loop {
            for name in PROJECT_FILES {
                let candidate = current.join(name);
                if candidate.exists() {
                    return Self::load(&candidate).map(Some);
                }
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                return Ok(None);
            }
        }
    }

    /// Check whether a path is this project's own configuration file.
    pub fn is_config_file(&self, path: &Path) -> bool {
        path == self.config_path
    }
}
