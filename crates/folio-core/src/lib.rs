/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Export compilation pipeline for Folio.
//!
//! This crate turns declarative export intent into finished artifacts:
//! it resolves front-matter export entries and override options into
//! validated, collision-free jobs, extracts template parts and tagged
//! content from document trees, merges side-data across articles, and
//! runs every job for a source file concurrently with per-job failure
//! isolation.
//!
//! # Architecture
//!
//! The pipeline is organized around these key types:
//!
//! - [`ExportContext`] - collaborators, overrides, and the diagnostic
//!   channel, threaded through every call
//! - [`ExportJob`] - one resolved, validated export request
//! - [`TemplateSideData`] - auxiliary render state merged across
//!   fragments and articles
//! - [`CompilationResult`] / [`BatchOutcome`] - per-job and aggregate
//!   results
//!
//! Parsing, rendering, template substitution, and archive creation live
//! behind the traits in [`collab`].
//!
//! # Example
//!
//! ```ignore
//! use folio_core::{ExportContext, ExportOverrides, resolve_jobs, run_batch};
//!
//! let ctx = ExportContext::new(finalizer, renderer, templates, archiver)
//!     .with_overrides(ExportOverrides::default());
//!
//! let jobs = resolve_jobs(&ctx, &source, &front_matter, &formats, project.as_ref())?;
//! let outcome = tokio::runtime::Runtime::new()?.block_on(run_batch(&ctx, jobs))?;
//! for diagnostic in ctx.take_diagnostics() {
//!     eprintln!("{}", diagnostic.message.to_text());
//! }
//! ```

pub mod batch;
pub mod collab;
pub mod compile;
pub mod context;
pub mod document;
pub mod error;
pub mod extract;
pub mod format;
pub mod frontmatter;
pub mod project;
pub mod resolve;
pub mod sidedata;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use batch::{BatchOutcome, JobOutcome, run_batch};
pub use collab::{
    Archiver, Finalized, Finalizer, RenderStyle, Rendered, Renderer, TemplateEngine,
};
pub use compile::{CompilationResult, compile_job};
pub use context::ExportContext;
pub use document::{Reference, SourceDocument, is_content_source};
pub use error::{ExportError, Result};
pub use extract::{
    Fragment, PartValue, TagSpec, TemplatePartSpec, extract_part, extract_tagged,
};
pub use format::ExportFormat;
pub use frontmatter::{CitationSettings, ExportEntry, FrontMatter, MathSettings};
pub use project::ProjectScope;
pub use resolve::{ExportJob, ExportOverrides, TemplateChoice, resolve_jobs};
pub use sidedata::TemplateSideData;
