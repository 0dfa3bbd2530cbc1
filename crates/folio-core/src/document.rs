/*
 * document.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Source document model.
 */

//! Source documents.
//!
//! A [`SourceDocument`] is one finalized article: its tree, front matter,
//! and bibliographic references, produced by the finalizer collaborator.
//! Each job owns independent copies of the documents it touches; no tree
//! is shared or mutated across jobs.

use std::path::{Path, PathBuf};

use folio_doctree::Blocks;

use crate::frontmatter::FrontMatter;

/// Source file extensions the pipeline recognizes as article content.
const CONTENT_EXTENSIONS: [&str; 4] = ["md", "markdown", "qmd", "ipynb"];

/// Check whether a path points at recognized article content.
pub fn is_content_source(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_lowercase();
            CONTENT_EXTENSIONS.iter().any(|c| *c == ext)
        })
}

/// A bibliographic reference attached to a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// Citation key
    pub id: String,
    /// Reference fields (author, title, year, ...) as structured data
    pub fields: serde_json::Value,
}

impl Reference {
    /// Create a reference with a key and no fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: serde_json::Value::Null,
        }
    }
}

/// One finalized article.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Source file path
    pub path: PathBuf,

    /// Finalized document tree
    pub tree: Blocks,

    /// Parsed front matter
    pub front_matter: FrontMatter,

    /// Bibliographic reference set
    pub references: Vec<Reference>,

    /// URL/file-safe slug derived from the file stem
    pub slug: String,
}

impl SourceDocument {
    /// Create a document, deriving its slug from the file stem.
    pub fn new(
        path: impl Into<PathBuf>,
        tree: Blocks,
        front_matter: FrontMatter,
        references: Vec<Reference>,
    ) -> Self {
        let path = path.into();
        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(slug::slugify)
            .unwrap_or_default();

        Self {
            path,
            tree,
            front_matter,
            references,
            slug,
        }
    }

    /// Get the file name without extension
    pub fn stem(&self) -> Option<&str> {
        self.path.file_stem().and_then(|s| s.to_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_content_source() {
        assert!(is_content_source(Path::new("notes.md")));
        assert!(is_content_source(Path::new("paper.QMD")));
        assert!(is_content_source(Path::new("analysis.ipynb")));
        assert!(!is_content_source(Path::new("style.css")));
        assert!(!is_content_source(Path::new("README")));
    }

    #[test]
    fn test_slug_from_stem() {
        let doc = SourceDocument::new(
            "/notes/My First Article.md",
            vec![],
            FrontMatter::empty(),
            vec![],
        );
        assert_eq!(doc.slug, "my-first-article");
        assert_eq!(doc.stem(), Some("My First Article"));
    }

    #[test]
    fn test_reference_new() {
        let r = Reference::new("knuth1984");
        assert_eq!(r.id, "knuth1984");
        assert!(r.fields.is_null());
    }
}
