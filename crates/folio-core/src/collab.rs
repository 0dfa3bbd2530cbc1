/*
 * collab.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Collaborator seams for the export pipeline.
 */

//! Collaborator traits.
//!
//! The pipeline orchestrates but does not implement parsing, rendering,
//! template substitution, or archive creation. Each of those concerns
//! sits behind a trait so embedders can plug in their own machinery and
//! tests can substitute doubles.

use std::path::Path;

use async_trait::async_trait;
use hashlink::LinkedHashMap;

use folio_doctree::Block;
use folio_error_reporting::DiagnosticMessage;

use crate::document::{Reference, SourceDocument};
use crate::error::Result;
use crate::extract::{PartValue, TagSpec, TemplatePartSpec};
use crate::frontmatter::FrontMatter;
use crate::resolve::TemplateChoice;
use crate::sidedata::TemplateSideData;

/// Style options handed to the renderer for one render call.
#[derive(Debug, Clone, Default)]
pub struct RenderStyle {
    /// Template-provided style options, present when a template is in use
    pub template_styles: Option<serde_json::Value>,

    /// Whether a glossary-printing pass is permitted
    pub print_glossaries: bool,

    /// Whether glossary definitions may be emitted at all
    pub emit_glossaries: bool,

    /// Job renderer options bag
    pub options: serde_json::Value,
}

/// Output of one render call.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Rendered text
    pub text: String,
    /// Side-data accumulated while rendering
    pub side_data: TemplateSideData,
}

/// Output of finalizing one article.
#[derive(Debug)]
pub struct Finalized {
    /// The finalized document
    pub document: SourceDocument,
    /// Non-fatal warnings raised during finalization
    pub warnings: Vec<DiagnosticMessage>,
}

/// Produces finalized documents from article paths.
///
/// Finalization covers parsing plus preprocessing: image/thumbnail
/// resolution and figure simplification. The pipeline never re-finalizes
/// a document within a job.
#[async_trait]
pub trait Finalizer: Send + Sync {
    async fn finalize(&self, path: &Path) -> Result<Finalized>;
}

/// Renders a document tree to target-format text.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render blocks to text, producing side-data along the way.
    async fn render(
        &self,
        blocks: &[Block],
        references: &[Reference],
        front_matter: &FrontMatter,
        style: &RenderStyle,
    ) -> Result<Rendered>;

    /// Produce a section heading for an article title, in the target
    /// format's syntax.
    fn section_heading(&self, title: &str) -> String;

    /// Produce a reference to an auxiliary file, in the target format's
    /// syntax.
    fn file_reference(&self, path: &Path) -> String;
}

/// Fills a document skeleton with rendered content.
#[async_trait]
pub trait TemplateEngine: Send + Sync {
    /// Make a template available for use, fetching or validating it as
    /// needed.
    async fn ensure_available(&self, template: &TemplateChoice) -> Result<()>;

    /// Part specs declared by the active template.
    fn part_specs(&self) -> Vec<TemplatePartSpec>;

    /// Tag specs declared by the active template.
    fn tag_specs(&self) -> Vec<TagSpec>;

    /// Style options the template contributes to body rendering.
    fn style_options(&self) -> serde_json::Value;

    /// Substitute body, parts, and side-data into the skeleton and write
    /// the result to `destination`.
    async fn substitute(
        &self,
        body: &str,
        parts: &LinkedHashMap<String, PartValue>,
        side_data: &TemplateSideData,
        front_matter: &FrontMatter,
        bibliography: bool,
        destination: &Path,
    ) -> Result<()>;
}

/// Bundles a directory into a single archive file.
#[async_trait]
pub trait Archiver: Send + Sync {
    async fn bundle(&self, directory: &Path, destination: &Path) -> Result<()>;
}
