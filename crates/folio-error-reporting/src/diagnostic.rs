/*
 * diagnostic.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Core diagnostic message types.
//!
//! This module defines the fundamental structures for representing
//! diagnostic messages (errors, warnings, info) following tidyverse-style
//! guidelines.

use serde::{Deserialize, Serialize};

/// The kind of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// An error that prevents completion
    Error,
    /// A warning that doesn't prevent completion but indicates a problem
    Warning,
    /// Informational message
    Info,
    /// A note providing additional context
    Note,
}

impl DiagnosticKind {
    /// Get the display prefix for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Warning => "Warning",
            DiagnosticKind::Info => "Info",
            DiagnosticKind::Note => "Note",
        }
    }
}

/// How detail items should be presented (tidyverse x/i bullet style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailKind {
    /// Error detail (✖ bullet)
    Error,
    /// Info detail (ℹ bullet)
    Info,
    /// Note detail (plain bullet)
    Note,
}

/// A detail item in a diagnostic message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailItem {
    /// The kind of detail (error, info, note)
    pub kind: DetailKind,
    /// The content of the detail
    pub content: String,
}

/// A diagnostic message following tidyverse-style structure.
///
/// Structure:
/// 1. **Title**: Brief message
/// 2. **Kind**: Error, Warning, Info, Note
/// 3. **Problem**: What went wrong (the "must" or "can't" statement)
/// 4. **Details**: Specific information (bulleted, max 5 per tidyverse)
/// 5. **Hints**: Optional guidance for fixing (ends with ?)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    /// Brief title for the message
    pub title: String,

    /// The kind of diagnostic
    pub kind: DiagnosticKind,

    /// The problem statement (the "what" - using "must" or "can't")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,

    /// Specific details (the "where/why")
    pub details: Vec<DetailItem>,

    /// Optional hints for fixing (ends with ?)
    pub hints: Vec<String>,
}

impl DiagnosticMessage {
    /// Create a new diagnostic message with just a title and kind.
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// Create an error diagnostic.
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    /// Create a warning diagnostic.
    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    /// Create an info diagnostic.
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, title)
    }

    /// Set the problem statement.
    pub fn with_problem(mut self, problem: impl Into<String>) -> Self {
        self.problem = Some(problem.into());
        self
    }

    /// Add an error detail (✖ bullet).
    pub fn add_detail(mut self, content: impl Into<String>) -> Self {
        self.details.push(DetailItem {
            kind: DetailKind::Error,
            content: content.into(),
        });
        self
    }

    /// Add an info detail (ℹ bullet).
    pub fn add_info(mut self, content: impl Into<String>) -> Self {
        self.details.push(DetailItem {
            kind: DetailKind::Info,
            content: content.into(),
        });
        self
    }

    /// Add a hint.
    pub fn add_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Render this diagnostic message as text following tidyverse style.
    ///
    /// Format:
    /// ```text
    /// Error: title
    /// Problem statement here
    /// ✖ Error detail
    /// ℹ Info detail
    /// • Note detail
    /// ? Hint
    /// ```
    pub fn to_text(&self) -> String {
        let mut result = format!("{}: {}", self.kind.as_str(), self.title);

        if let Some(problem) = &self.problem {
            result.push('\n');
            result.push_str(problem);
        }

        for detail in &self.details {
            let bullet = match detail.kind {
                DetailKind::Error => "✖",
                DetailKind::Info => "ℹ",
                DetailKind::Note => "•",
            };
            result.push('\n');
            result.push_str(bullet);
            result.push(' ');
            result.push_str(&detail.content);
        }

        for hint in &self.hints {
            result.push('\n');
            result.push_str("? ");
            result.push_str(hint);
        }

        result
    }

    /// Check whether this diagnostic is an error.
    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_error() {
        let msg = DiagnosticMessage::error("Invalid export");
        assert_eq!(msg.kind, DiagnosticKind::Error);
        assert!(msg.is_error());
        assert_eq!(msg.to_text(), "Error: Invalid export");
    }

    #[test]
    fn test_warning_not_error() {
        let msg = DiagnosticMessage::warning("Missing file");
        assert!(!msg.is_error());
        assert!(msg.to_text().starts_with("Warning:"));
    }

    #[test]
    fn test_full_structure() {
        let msg = DiagnosticMessage::error("Wrong output extension")
            .with_problem("Output path must end with `.tex`")
            .add_detail("Found `report.pdf`")
            .add_info("The export format is `latex`")
            .add_hint("Change the declared output path?");

        let text = msg.to_text();
        assert!(text.contains("Error: Wrong output extension"));
        assert!(text.contains("Output path must end with `.tex`"));
        assert!(text.contains("✖ Found `report.pdf`"));
        assert!(text.contains("ℹ The export format is `latex`"));
        assert!(text.contains("? Change the declared output path?"));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let msg = DiagnosticMessage::warning("Duplicate part")
            .add_detail("Part `abstract` already has a value");
        let json = serde_json::to_string(&msg).unwrap();
        let back: DiagnosticMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, back);
    }
}
