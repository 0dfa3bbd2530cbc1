/*
 * extract.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Template part extraction.
 */

//! Template part extraction.
//!
//! Two independent mechanisms pull fragments out of a document tree:
//!
//! 1. **By declared part id**: selects the unique subtree whose attr id
//!    matches a template part declaration. With `as_list`, the subtree
//!    shape is classified and yields one fragment per list item or per
//!    top-level block.
//! 2. **By tag**: selects every block carrying a matching class,
//!    concatenates the matches in document order, and empties the matched
//!    nodes in place so the main body render omits them.
//!
//! Side-data from every extracted fragment merges into the caller's
//! running total.

use folio_doctree::{Block, Blocks, Div, has_class};

use crate::collab::{Renderer, RenderStyle};
use crate::document::SourceDocument;
use crate::error::Result;
use crate::sidedata::TemplateSideData;

/// A template part declaration, provided by the template engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplatePartSpec {
    /// Part id, matched against block attr ids
    pub id: String,
    /// Whether the part yields a fragment sequence instead of one fragment
    pub as_list: bool,
    /// Optional source template descriptor for this part
    pub template: Option<String>,
}

impl TemplatePartSpec {
    /// Create a single-fragment part spec.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            as_list: false,
            template: None,
        }
    }

    /// Create a list-valued part spec.
    pub fn list(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            as_list: true,
            template: None,
        }
    }
}

/// A tagged-content declaration, provided by the template engine.
///
/// The size fields are accepted configuration carried for callers;
/// extraction does not apply them.
#[derive(Debug, Clone, PartialEq)]
pub struct TagSpec {
    /// Class name matched against block attrs
    pub name: String,
    /// Character guidance for the tagged content
    pub max_chars: Option<usize>,
    /// Word guidance for the tagged content
    pub max_words: Option<usize>,
}

impl TagSpec {
    /// Create a tag spec with no size guidance.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_chars: None,
            max_words: None,
        }
    }
}

/// One unit of rendered text plus its side-data.
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Rendered text
    pub text: String,
    /// Side-data produced while rendering this fragment
    pub side_data: TemplateSideData,
}

/// The value extracted for a part: one fragment, or an ordered sequence.
#[derive(Debug, Clone)]
pub enum PartValue {
    Single(Fragment),
    List(Vec<Fragment>),
}

impl PartValue {
    /// Iterate the fragments of this value.
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        match self {
            PartValue::Single(f) => std::slice::from_ref(f).iter(),
            PartValue::List(fs) => fs.iter(),
        }
    }
}

/// Structural classification of a part subtree for `as_list` extraction.
enum SubtreeShape<'a> {
    /// One wrapper containing one wrapper containing a single list node
    ListShaped(&'a [Blocks]),
    /// Anything else: top-level child blocks stand alone
    BlockShaped(&'a [Block]),
}

fn classify_subtree(blocks: &[Block]) -> SubtreeShape<'_> {
    if let [Block::Div(inner)] = blocks
        && let [list] = inner.content.as_slice()
        && let Some(items) = list.list_items()
    {
        return SubtreeShape::ListShaped(items);
    }
    SubtreeShape::BlockShaped(blocks)
}

/// Find the unique subtree tagged with a part id.
fn find_part<'a>(blocks: &'a [Block], id: &str) -> Option<&'a Div> {
    for block in blocks {
        match block {
            Block::Div(div) => {
                if div.attr.0 == id {
                    return Some(div);
                }
                if let Some(found) = find_part(&div.content, id) {
                    return Some(found);
                }
            }
            Block::BlockQuote(quote) => {
                if let Some(found) = find_part(&quote.content, id) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}

/// Extract a declared part from a document.
///
/// An absent part id yields `Ok(None)`, not an error. Side-data from every
/// rendered fragment merges into `total`.
pub async fn extract_part(
    document: &SourceDocument,
    spec: &TemplatePartSpec,
    renderer: &dyn Renderer,
    style: &RenderStyle,
    total: &mut TemplateSideData,
    on_conflict: &mut (dyn FnMut(&str) + Send),
) -> Result<Option<PartValue>> {
    let Some(div) = find_part(&document.tree, &spec.id) else {
        return Ok(None);
    };

    // A part's local citations cannot resolve glossary definitions living
    // in the main body; fragments render without glossary emission.
    let fragment_style = fragment_style(style);

    if !spec.as_list {
        let fragment = render_fragment(
            &div.content,
            document,
            renderer,
            &fragment_style,
            total,
            on_conflict,
        )
        .await?;
        return Ok(Some(PartValue::Single(fragment)));
    }

    let mut fragments = Vec::new();
    match classify_subtree(&div.content) {
        SubtreeShape::ListShaped(items) => {
            for item in items {
                fragments.push(
                    render_fragment(item, document, renderer, &fragment_style, total, on_conflict)
                        .await?,
                );
            }
        }
        SubtreeShape::BlockShaped(blocks) => {
            for block in blocks {
                fragments.push(
                    render_fragment(
                        std::slice::from_ref(block),
                        document,
                        renderer,
                        &fragment_style,
                        total,
                        on_conflict,
                    )
                    .await?,
                );
            }
        }
    }
    Ok(Some(PartValue::List(fragments)))
}

/// Extract tagged content from a document, emptying matched nodes in place.
///
/// Matches concatenate in document order, joined by a blank line. An
/// absent tag yields `Ok(None)` and leaves the tree untouched.
pub async fn extract_tagged(
    document: &mut SourceDocument,
    tag: &TagSpec,
    renderer: &dyn Renderer,
    style: &RenderStyle,
    total: &mut TemplateSideData,
    on_conflict: &mut (dyn FnMut(&str) + Send),
) -> Result<Option<Fragment>> {
    let mut matches = Vec::new();
    take_tagged(&mut document.tree, &tag.name, &mut matches);
    if matches.is_empty() {
        return Ok(None);
    }

    let fragment_style = fragment_style(style);

    let mut text = String::new();
    let mut side_data = TemplateSideData::new();
    for (i, blocks) in matches.iter().enumerate() {
        let rendered = renderer
            .render(
                blocks,
                &document.references,
                &document.front_matter,
                &fragment_style,
            )
            .await?;
        if i > 0 {
            text.push_str("\n\n");
        }
        text.push_str(&rendered.text);
        side_data.merge_from(&rendered.side_data, on_conflict);
    }

    total.merge_from(&side_data, on_conflict);
    Ok(Some(Fragment { text, side_data }))
}

fn fragment_style(style: &RenderStyle) -> RenderStyle {
    RenderStyle {
        emit_glossaries: false,
        print_glossaries: false,
        ..style.clone()
    }
}

async fn render_fragment(
    blocks: &[Block],
    document: &SourceDocument,
    renderer: &dyn Renderer,
    style: &RenderStyle,
    total: &mut TemplateSideData,
    on_conflict: &mut (dyn FnMut(&str) + Send),
) -> Result<Fragment> {
    let rendered = renderer
        .render(blocks, &document.references, &document.front_matter, style)
        .await?;
    total.merge_from(&rendered.side_data, on_conflict);
    Ok(Fragment {
        text: rendered.text,
        side_data: rendered.side_data,
    })
}

/// Empty every block carrying the tag, collecting the taken content in
/// document order. Untagged nodes are untouched.
fn take_tagged(blocks: &mut Blocks, tag: &str, matches: &mut Vec<Blocks>) {
    for block in blocks.iter_mut() {
        let tagged = block.attr().is_some_and(|attr| has_class(attr, tag));
        if tagged {
            matches.push(block.take_content());
            continue;
        }
        match block {
            Block::Div(div) => take_tagged(&mut div.content, tag, matches),
            Block::BlockQuote(quote) => take_tagged(&mut quote.content, tag, matches),
            Block::BulletList(list) => {
                for item in &mut list.items {
                    take_tagged(item, tag, matches);
                }
            }
            Block::OrderedList(list) => {
                for item in &mut list.items {
                    take_tagged(item, tag, matches);
                }
            }
            _ => {}
        }
    }
}
