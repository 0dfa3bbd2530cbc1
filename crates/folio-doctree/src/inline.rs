/*
 * inline.rs
 * Copyright (c) 2025 Posit, PBC
 */

use serde::{Deserialize, Serialize};

use crate::attr::Attr;

pub type Inlines = Vec<Inline>;

/// Link/image target: (url, title).
pub type Target = (String, String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MathType {
    Display,
    Inline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Code {
    pub attr: Attr,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Math {
    pub math_type: MathType,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub attr: Attr,
    pub content: Inlines,
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub attr: Attr,
    pub alt: Inlines,
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub attr: Attr,
    pub content: Inlines,
}

/// Inline-level tree node.
///
/// A closed set of variants: every node kind the pipeline can encounter
/// is listed here, and consumers match exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Inline {
    Str(String),
    Emph(Inlines),
    Strong(Inlines),
    Code(Code),
    Math(Math),
    Link(Link),
    Image(Image),
    Span(Span),
    Cite(Vec<String>),
    RawInline(String, String),
    Space,
    SoftBreak,
    LineBreak,
}

/// Flatten inline content to plain text.
///
/// Used for title comparison and slug derivation; formatting and raw
/// fragments contribute their textual payload only.
pub fn inlines_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Str(s) => out.push_str(s),
            Inline::Emph(content) | Inline::Strong(content) => out.push_str(&inlines_text(content)),
            Inline::Code(code) => out.push_str(&code.text),
            Inline::Math(math) => out.push_str(&math.text),
            Inline::Link(link) => out.push_str(&inlines_text(&link.content)),
            Inline::Image(image) => out.push_str(&inlines_text(&image.alt)),
            Inline::Span(span) => out.push_str(&inlines_text(&span.content)),
            Inline::Cite(keys) => {
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    out.push('@');
                    out.push_str(key);
                }
            }
            Inline::RawInline(_, text) => out.push_str(text),
            Inline::Space | Inline::SoftBreak => out.push(' '),
            Inline::LineBreak => out.push('\n'),
        }
    }
    out
}
