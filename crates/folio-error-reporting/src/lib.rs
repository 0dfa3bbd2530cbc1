/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Diagnostic reporting for Folio.
//!
//! This crate defines the structured diagnostic messages emitted by the
//! export pipeline (errors, warnings, notes following tidyverse-style
//! guidelines) and the file-scoped channel they accumulate on. A batch
//! run collects diagnostics per originating source file and reports them
//! after completion rather than terminating on the first problem.

pub mod collector;
pub mod diagnostic;

pub use collector::{DiagnosticCollector, FileDiagnostic};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage};
