/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Export context threaded through the pipeline.
 */

//! Export context.
//!
//! The [`ExportContext`] is constructed once per run and passed by
//! reference through every resolver and orchestrator call. It carries the
//! collaborator seams, the override options, and the shared diagnostic
//! collector. There is no process-global state anywhere in the pipeline.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use folio_error_reporting::{DiagnosticCollector, DiagnosticMessage, FileDiagnostic};

use crate::collab::{Archiver, Finalizer, Renderer, TemplateEngine};
use crate::resolve::ExportOverrides;

/// Context for one export run.
///
/// Cloning is cheap: collaborators and the diagnostic collector are
/// shared, so jobs running concurrently report into the same channel.
#[derive(Clone)]
pub struct ExportContext {
    /// Produces finalized documents from article paths
    pub finalizer: Arc<dyn Finalizer>,

    /// Renders document trees to target-format text
    pub renderer: Arc<dyn Renderer>,

    /// Fills document skeletons
    pub templates: Arc<dyn TemplateEngine>,

    /// Bundles directories into archives
    pub archiver: Arc<dyn Archiver>,

    /// Override options for this run
    pub overrides: ExportOverrides,

    diagnostics: Arc<Mutex<DiagnosticCollector>>,
}

impl ExportContext {
    /// Create a context with default overrides.
    pub fn new(
        finalizer: Arc<dyn Finalizer>,
        renderer: Arc<dyn Renderer>,
        templates: Arc<dyn TemplateEngine>,
        archiver: Arc<dyn Archiver>,
    ) -> Self {
        Self {
            finalizer,
            renderer,
            templates,
            archiver,
            overrides: ExportOverrides::default(),
            diagnostics: Arc::new(Mutex::new(DiagnosticCollector::new())),
        }
    }

    /// Set the override options.
    pub fn with_overrides(mut self, overrides: ExportOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    fn collector(&self) -> MutexGuard<'_, DiagnosticCollector> {
        match self.diagnostics.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Attach a diagnostic to a source file.
    pub fn report(&self, path: impl AsRef<Path>, message: DiagnosticMessage) {
        self.collector().push(path.as_ref(), message);
    }

    /// Attach a file-scoped warning.
    pub fn warn_file(&self, path: impl AsRef<Path>, title: impl Into<String>) {
        self.report(path, DiagnosticMessage::warning(title));
    }

    /// Attach a file-scoped error.
    pub fn error_file(&self, path: impl AsRef<Path>, title: impl Into<String>) {
        self.report(path, DiagnosticMessage::error(title));
    }

    /// Snapshot of the accumulated diagnostics.
    pub fn diagnostics(&self) -> Vec<FileDiagnostic> {
        self.collector().entries().to_vec()
    }

    /// Drain the accumulated diagnostics.
    pub fn take_diagnostics(&self) -> Vec<FileDiagnostic> {
        self.collector().take()
    }
}
