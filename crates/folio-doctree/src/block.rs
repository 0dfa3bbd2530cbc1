/*
 * block.rs
 * Copyright (c) 2025 Posit, PBC
 */

use serde::{Deserialize, Serialize};

use crate::attr::{Attr, empty_attr};
use crate::inline::{Inlines, inlines_text};

pub type Blocks = Vec<Block>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plain {
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub level: u8,
    pub attr: Attr,
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletList {
    pub items: Vec<Blocks>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedList {
    pub start: usize,
    pub items: Vec<Blocks>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub attr: Attr,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    pub format: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Div {
    pub attr: Attr,
    pub content: Blocks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockQuote {
    pub content: Blocks,
}

/// Block-level tree node.
///
/// A closed set of variants with explicit ownership of children. The
/// extractor and renderers match exhaustively on this enum; there is no
/// runtime shape probing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(Paragraph),
    Plain(Plain),
    Header(Header),
    BulletList(BulletList),
    OrderedList(OrderedList),
    CodeBlock(CodeBlock),
    RawBlock(RawBlock),
    Div(Div),
    BlockQuote(BlockQuote),
    HorizontalRule,
}

impl Block {
    /// The attr carried by this node, for kinds that have one.
    pub fn attr(&self) -> Option<&Attr> {
        match self {
            Block::Header(h) => Some(&h.attr),
            Block::CodeBlock(c) => Some(&c.attr),
            Block::Div(d) => Some(&d.attr),
            _ => None,
        }
    }

    /// True when this node is a bullet or ordered list.
    pub fn is_list(&self) -> bool {
        matches!(self, Block::BulletList(_) | Block::OrderedList(_))
    }

    /// List items, for list nodes.
    pub fn list_items(&self) -> Option<&[Blocks]> {
        match self {
            Block::BulletList(l) => Some(&l.items),
            Block::OrderedList(l) => Some(&l.items),
            _ => None,
        }
    }

    /// Take this node's content, leaving the node emptied in place.
    ///
    /// The shell node stays in the tree; what is returned is the content
    /// as standalone blocks, suitable for rendering on its own.
    pub fn take_content(&mut self) -> Blocks {
        match self {
            Block::Div(d) => std::mem::take(&mut d.content),
            Block::Header(h) => {
                let content = std::mem::take(&mut h.content);
                vec![Block::Plain(Plain { content })]
            }
            Block::CodeBlock(c) => {
                let text = std::mem::take(&mut c.text);
                vec![Block::CodeBlock(CodeBlock {
                    attr: empty_attr(),
                    text,
                })]
            }
            Block::BlockQuote(q) => std::mem::take(&mut q.content),
            Block::Paragraph(p) => {
                let content = std::mem::take(&mut p.content);
                vec![Block::Paragraph(Paragraph { content })]
            }
            Block::Plain(p) => {
                let content = std::mem::take(&mut p.content);
                vec![Block::Plain(Plain { content })]
            }
            Block::BulletList(l) => vec![Block::BulletList(BulletList {
                items: std::mem::take(&mut l.items),
            })],
            Block::OrderedList(l) => {
                let items = std::mem::take(&mut l.items);
                vec![Block::OrderedList(OrderedList {
                    start: l.start,
                    items,
                })]
            }
            Block::RawBlock(r) => {
                let text = std::mem::take(&mut r.text);
                vec![Block::RawBlock(RawBlock {
                    format: r.format.clone(),
                    text,
                })]
            }
            Block::HorizontalRule => Vec::new(),
        }
    }

    /// Flatten this block to plain text.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph(p) => inlines_text(&p.content),
            Block::Plain(p) => inlines_text(&p.content),
            Block::Header(h) => inlines_text(&h.content),
            Block::BulletList(l) => list_text(&l.items),
            Block::OrderedList(l) => list_text(&l.items),
            Block::CodeBlock(c) => c.text.clone(),
            Block::RawBlock(r) => r.text.clone(),
            Block::Div(d) => blocks_text(&d.content),
            Block::BlockQuote(q) => blocks_text(&q.content),
            Block::HorizontalRule => String::new(),
        }
    }
}

fn list_text(items: &[Blocks]) -> String {
    items
        .iter()
        .map(|item| blocks_text(item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Flatten a block sequence to plain text, blocks separated by blank lines.
pub fn blocks_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|b| b.plain_text())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
