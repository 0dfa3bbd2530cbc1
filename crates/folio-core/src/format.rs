/*
 * format.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Export format types.
 */

//! Export format specification.
//!
//! Formats determine what a job produces. The format includes:
//! - The format identifier (latex, docx, odt, markdown, bundle)
//! - The output file extension and default output subfolder
//! - Whether the format can be wrapped into an archive

/// Export format identifier enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Typeset output (.tex)
    Latex,
    /// Word document
    Docx,
    /// OpenDocument text
    Odt,
    /// Plain markdown
    Markdown,
    /// Archive of co-located exports (.zip)
    Bundle,
}

impl ExportFormat {
    /// Get the format name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Latex => "latex",
            ExportFormat::Docx => "docx",
            ExportFormat::Odt => "odt",
            ExportFormat::Markdown => "markdown",
            ExportFormat::Bundle => "bundle",
        }
    }

    /// Output file extension (without leading dot)
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Latex => "tex",
            ExportFormat::Docx => "docx",
            ExportFormat::Odt => "odt",
            ExportFormat::Markdown => "md",
            ExportFormat::Bundle => "zip",
        }
    }

    /// Name of the default output subfolder for this format
    pub fn default_folder(&self) -> &'static str {
        self.as_str()
    }

    /// Extension used for rendered content when this format is wrapped
    /// into an archive. The archive itself keeps [`Self::extension`].
    pub fn content_extension(&self) -> &'static str {
        match self {
            ExportFormat::Bundle => "md",
            other => other.extension(),
        }
    }

    /// Check if this format's output can be wrapped into a zip archive.
    ///
    /// Text-based formats ship with auxiliary files and can be archived;
    /// single-file binary containers cannot.
    pub fn supports_archive(&self) -> bool {
        matches!(self, ExportFormat::Latex | ExportFormat::Markdown)
    }

    /// Check if this format is itself an archive
    pub fn is_archive(&self) -> bool {
        matches!(self, ExportFormat::Bundle)
    }

    /// Check if this format bundles co-located exports and therefore
    /// does not require a primary article
    pub fn bundles_without_articles(&self) -> bool {
        matches!(self, ExportFormat::Bundle)
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for ExportFormat {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "latex" | "tex" => Ok(ExportFormat::Latex),
            "docx" => Ok(ExportFormat::Docx),
            "odt" => Ok(ExportFormat::Odt),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "bundle" => Ok(ExportFormat::Bundle),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}
