/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Document tree type definitions for Folio.
 *
 * This crate provides pure data type definitions for the finalized
 * document tree that the export pipeline operates on. It has minimal
 * dependencies (serde, hashlink) and can be used by any crate that
 * needs to inspect or rewrite document structure.
 */

pub mod attr;
pub mod block;
pub mod inline;

// Re-export commonly used types at the crate root
pub use attr::{Attr, attr_value, empty_attr, has_class, is_empty_attr};
pub use block::{
    Block, BlockQuote, Blocks, BulletList, CodeBlock, Div, Header, OrderedList,
    Paragraph, Plain, RawBlock, blocks_text,
};
pub use inline::{Code, Image, Inline, Inlines, Link, Math, MathType, Span, Target, inlines_text};
