/*
 * collector.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! File-scoped diagnostic accumulation.
//!
//! Diagnostics attach to the source file that originated them. A batch run
//! pushes into one collector from every job and reports the accumulated
//! set after all jobs finish.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostic::{DiagnosticKind, DiagnosticMessage};

/// A diagnostic message attached to the source file that originated it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDiagnostic {
    /// Originating source path
    pub path: PathBuf,
    /// The diagnostic message
    pub message: DiagnosticMessage,
}

/// Accumulates file-scoped diagnostics for a run.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    entries: Vec<FileDiagnostic>,
}

impl DiagnosticCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a diagnostic to a source file.
    pub fn push(&mut self, path: impl Into<PathBuf>, message: DiagnosticMessage) {
        self.entries.push(FileDiagnostic {
            path: path.into(),
            message,
        });
    }

    /// Attach a warning with the given title.
    pub fn warn(&mut self, path: impl Into<PathBuf>, title: impl Into<String>) {
        self.push(path, DiagnosticMessage::warning(title));
    }

    /// Attach an error with the given title.
    pub fn error(&mut self, path: impl Into<PathBuf>, title: impl Into<String>) {
        self.push(path, DiagnosticMessage::error(title));
    }

    /// All accumulated diagnostics, in arrival order.
    pub fn entries(&self) -> &[FileDiagnostic] {
        &self.entries
    }

    /// Diagnostics for one source file.
    pub fn for_file<'a>(&'a self, path: &'a Path) -> impl Iterator<Item = &'a FileDiagnostic> {
        self.entries.iter().filter(move |e| e.path == path)
    }

    /// Whether any accumulated diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.message.is_error())
    }

    /// Number of accumulated diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drain the accumulated diagnostics.
    pub fn take(&mut self) -> Vec<FileDiagnostic> {
        std::mem::take(&mut self.entries)
    }

    /// Render every diagnostic as text, one per line group.
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}: {}", e.path.display(), e.message.to_text()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Count diagnostics of a given kind.
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries
            .iter()
            .filter(|e| e.message.kind == kind)
            .count()
    }
}
