/*
 * testing.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Collaborator doubles shared across unit tests.
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hashlink::LinkedHashMap;

use folio_doctree::{Block, blocks_text};

use crate::collab::{
    Archiver, Finalized, Finalizer, RenderStyle, Rendered, Renderer, TemplateEngine,
};
use crate::context::ExportContext;
use crate::document::{Reference, SourceDocument};
use crate::error::{ExportError, Result};
use crate::extract::{PartValue, TagSpec, TemplatePartSpec};
use crate::frontmatter::FrontMatter;
use crate::resolve::TemplateChoice;
use crate::sidedata::TemplateSideData;

/// Finalizer double serving pre-registered documents by path.
#[derive(Default)]
pub(crate) struct StubFinalizer {
    docs: Mutex<HashMap<PathBuf, SourceDocument>>,
}

impl StubFinalizer {
    pub fn insert(&self, doc: SourceDocument) {
        self.docs.lock().unwrap().insert(doc.path.clone(), doc);
    }
}

#[async_trait]
impl Finalizer for StubFinalizer {
    async fn finalize(&self, path: &Path) -> Result<Finalized> {
        let doc = self
            .docs
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| {
                ExportError::Finalize(format!("no document registered for {}", path.display()))
            })?;
        Ok(Finalized {
            document: doc,
            warnings: Vec::new(),
        })
    }
}

/// Renderer double: flattens blocks to plain text.
///
/// Side-data is driven by the document's raw front matter so tests can
/// stage imports, glossary entries, and forced failures:
/// `imports: [..]`, `glossary: {..}`, `fail: true`.
pub(crate) struct PlainRenderer;

#[async_trait]
impl Renderer for PlainRenderer {
    async fn render(
        &self,
        blocks: &[Block],
        _references: &[Reference],
        front_matter: &FrontMatter,
        _style: &RenderStyle,
    ) -> Result<Rendered> {
        let raw = &front_matter.raw;
        if raw.get("fail").and_then(|v| v.as_bool()).unwrap_or(false) {
            return Err(ExportError::Render("forced render failure".to_string()));
        }

        let mut side_data = TemplateSideData::new();
        if let Some(imports) = raw.get("imports").and_then(|v| v.as_array()) {
            for import in imports.iter().filter_map(|v| v.as_str()) {
                side_data.add_import(import);
            }
        }
        if let Some(glossary) = raw.get("glossary").and_then(|v| v.as_object()) {
            for (key, value) in glossary {
                side_data
                    .glossary
                    .insert(key.clone(), value.as_str().unwrap_or_default().to_string());
            }
        }

        Ok(Rendered {
            text: blocks_text(blocks),
            side_data,
        })
    }

    fn section_heading(&self, title: &str) -> String {
        format!("== {} ==", title)
    }

    fn file_reference(&self, path: &Path) -> String {
        format!("include <{}>", path.display())
    }
}

/// Template engine double with static specs and a transparent skeleton.
#[derive(Default)]
pub(crate) struct StaticTemplateEngine {
    pub parts: Vec<TemplatePartSpec>,
    pub tags: Vec<TagSpec>,
}

#[async_trait]
impl TemplateEngine for StaticTemplateEngine {
    async fn ensure_available(&self, _template: &TemplateChoice) -> Result<()> {
        Ok(())
    }

    fn part_specs(&self) -> Vec<TemplatePartSpec> {
        self.parts.clone()
    }

    fn tag_specs(&self) -> Vec<TagSpec> {
        self.tags.clone()
    }

    fn style_options(&self) -> serde_json::Value {
        serde_json::Value::Null
    }

    async fn substitute(
        &self,
        body: &str,
        parts: &LinkedHashMap<String, PartValue>,
        side_data: &TemplateSideData,
        _front_matter: &FrontMatter,
        bibliography: bool,
        destination: &Path,
    ) -> Result<()> {
        let mut out = String::from("TEMPLATE\n");
        if !side_data.imports.is_empty() {
            out.push_str(&format!("imports: {}\n", side_data.imports.join(",")));
        }
        for (id, value) in parts {
            let texts: Vec<&str> = value.fragments().map(|f| f.text.as_str()).collect();
            out.push_str(&format!("part {}: {}\n", id, texts.join(" | ")));
        }
        out.push_str(body);
        if bibliography {
            out.push_str("\nBIBLIOGRAPHY");
        }
        std::fs::write(destination, out)?;
        Ok(())
    }
}

/// Archiver double: writes a listing of the bundled directory.
pub(crate) struct ListingArchiver;

#[async_trait]
impl Archiver for ListingArchiver {
    async fn bundle(&self, directory: &Path, destination: &Path) -> Result<()> {
        let mut names: Vec<String> = std::fs::read_dir(directory)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        std::fs::write(destination, format!("ARCHIVE\n{}", names.join("\n")))?;
        Ok(())
    }
}

/// A context wired with the default doubles.
pub(crate) fn test_context() -> ExportContext {
    ExportContext::new(
        Arc::new(StubFinalizer::default()),
        Arc::new(PlainRenderer),
        Arc::new(StaticTemplateEngine::default()),
        Arc::new(ListingArchiver),
    )
}
