/*
 * sidedata.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Auxiliary render state merged across fragments and articles.
 */

//! Template side-data.
//!
//! Renderers produce [`TemplateSideData`] alongside rendered text:
//! preamble imports, macro definitions, and glossary state. Side-data
//! merges across fragments and articles into one running total that is
//! substituted into the template preamble.
//!
//! Merge semantics:
//! - imports: concatenate, dedup by first occurrence (order preserved)
//! - `has_proofs` / `print_glossaries`: logical OR
//! - macros / glossary / abbreviations: union by key, last write wins;
//!   a conflict callback fires once per overwritten key

use hashlink::LinkedHashMap;
use serde::{Deserialize, Serialize};

/// Auxiliary render state produced alongside rendered text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateSideData {
    /// Preamble import identifiers, deduplicated, first-seen order
    pub imports: Vec<String>,

    /// Macro name to definition
    pub macros: LinkedHashMap<String, String>,

    /// Whether any fragment contained proof environments
    pub has_proofs: bool,

    /// Whether a glossary-printing pass was requested
    pub print_glossaries: bool,

    /// Glossary term definitions
    pub glossary: LinkedHashMap<String, String>,

    /// Abbreviation definitions
    pub abbreviations: LinkedHashMap<String, String>,
}

impl TemplateSideData {
    /// Create empty side-data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an import identifier, keeping first-seen order and dropping
    /// duplicates.
    pub fn add_import(&mut self, import: impl Into<String>) {
        let import = import.into();
        if !self.imports.contains(&import) {
            self.imports.push(import);
        }
    }

    /// Merge another side-data value into this one.
    ///
    /// `on_conflict` is invoked with the key for every mapping entry whose
    /// existing value gets overwritten by a different incoming value.
    pub fn merge_from(
        &mut self,
        other: &TemplateSideData,
        on_conflict: &mut (dyn FnMut(&str) + Send),
    ) {
        for import in &other.imports {
            self.add_import(import.clone());
        }

        self.has_proofs |= other.has_proofs;
        self.print_glossaries |= other.print_glossaries;

        merge_map(&mut self.macros, &other.macros, on_conflict);
        merge_map(&mut self.glossary, &other.glossary, on_conflict);
        merge_map(&mut self.abbreviations, &other.abbreviations, on_conflict);
    }

    /// Whether any glossary or abbreviation entries are present.
    pub fn has_glossary_content(&self) -> bool {
        !self.glossary.is_empty() || !self.abbreviations.is_empty()
    }

    /// Whether this side-data carries nothing at all.
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
            && self.macros.is_empty()
            && !self.has_proofs
            && !self.print_glossaries
            && self.glossary.is_empty()
            && self.abbreviations.is_empty()
    }
}

/// Union `from` into `into` with last-write-wins on key conflicts.
fn merge_map(
    into: &mut LinkedHashMap<String, String>,
    from: &LinkedHashMap<String, String>,
    on_conflict: &mut (dyn FnMut(&str) + Send),
) {
    for (key, value) in from {
        if let Some(existing) = into.get(key)
            && existing != value
        {
            on_conflict(key);
        }
        into.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_imports(imports: &[&str]) -> TemplateSideData {
        let mut data = TemplateSideData::new();
        for import in imports {
            data.add_import(*import);
        }
        data
    }

    fn no_conflict(key: &str) -> ! {
        panic!("unexpected conflict on key `{}`", key)
    }

    #[test]
    fn test_imports_dedup_first_seen() {
        let mut total = with_imports(&["amsmath", "graphicx"]);
        let other = with_imports(&["graphicx", "booktabs", "amsmath"]);

        total.merge_from(&other, &mut |k| no_conflict(k));
        assert_eq!(total.imports, vec!["amsmath", "graphicx", "booktabs"]);
    }

    #[test]
    fn test_imports_merge_commutative_as_set() {
        let a = with_imports(&["one", "two"]);
        let b = with_imports(&["three", "two"]);

        let mut ab = a.clone();
        ab.merge_from(&b, &mut |k| no_conflict(k));
        let mut ba = b.clone();
        ba.merge_from(&a, &mut |k| no_conflict(k));

        let mut ab_sorted = ab.imports.clone();
        ab_sorted.sort();
        let mut ba_sorted = ba.imports.clone();
        ba_sorted.sort();
        assert_eq!(ab_sorted, ba_sorted);
    }

    #[test]
    fn test_booleans_or() {
        let mut total = TemplateSideData::new();
        let mut other = TemplateSideData::new();
        other.has_proofs = true;

        total.merge_from(&other, &mut |k| no_conflict(k));
        assert!(total.has_proofs);
        assert!(!total.print_glossaries);

        // OR never clears a set flag
        total.merge_from(&TemplateSideData::new(), &mut |k| no_conflict(k));
        assert!(total.has_proofs);
    }

    #[test]
    fn test_map_conflict_last_write_wins() {
        let mut total = TemplateSideData::new();
        total
            .macros
            .insert("R".to_string(), "\\mathbb{R}".to_string());

        let mut other = TemplateSideData::new();
        other
            .macros
            .insert("R".to_string(), "\\mathrm{R}".to_string());

        let mut conflicts = Vec::new();
        total.merge_from(&other, &mut |key| conflicts.push(key.to_string()));

        assert_eq!(total.macros.get("R").map(String::as_str), Some("\\mathrm{R}"));
        assert_eq!(conflicts, vec!["R"]);
    }

    #[test]
    fn test_map_equal_value_no_conflict() {
        let mut total = TemplateSideData::new();
        total.glossary.insert("ast".to_string(), "tree".to_string());

        let other = total.clone();
        total.merge_from(&other, &mut |k| no_conflict(k));
        assert_eq!(total.glossary.len(), 1);
    }

    #[test]
    fn test_merge_associative_for_imports_and_flags() {
        let a = with_imports(&["a"]);
        let mut b = with_imports(&["b"]);
        b.print_glossaries = true;
        let c = with_imports(&["c", "a"]);

        // (a + b) + c
        let mut left = a.clone();
        left.merge_from(&b, &mut |k| no_conflict(k));
        left.merge_from(&c, &mut |k| no_conflict(k));

        // a + (b + c)
        let mut bc = b.clone();
        bc.merge_from(&c, &mut |k| no_conflict(k));
        let mut right = a.clone();
        right.merge_from(&bc, &mut |k| no_conflict(k));

        assert_eq!(left, right);
    }

    #[test]
    fn test_has_glossary_content() {
        let mut data = TemplateSideData::new();
        assert!(!data.has_glossary_content());
        assert!(data.is_empty());

        data.abbreviations
            .insert("AST".to_string(), "abstract syntax tree".to_string());
        assert!(data.has_glossary_content());
        assert!(!data.is_empty());
    }
}
