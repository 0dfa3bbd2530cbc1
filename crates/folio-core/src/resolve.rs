/*
 * resolve.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Export job resolution.
 */

//! Export job resolution.
//!
//! The resolver turns declared export intent (front matter entries,
//! requested formats, override options) into validated [`ExportJob`]s.
//! It never touches document trees; everything it needs is front matter,
//! the filesystem, and the override options.
//!
//! Resolution is where collision-freedom is established: output paths are
//! deduplicated across the whole batch before any job starts, so no two
//! jobs from one invocation ever share an output path.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use folio_error_reporting::DiagnosticMessage;

use crate::context::ExportContext;
use crate::document::is_content_source;
use crate::error::{ExportError, Result};
use crate::format::ExportFormat;
use crate::frontmatter::{ExportEntry, FrontMatter};
use crate::project::ProjectScope;

/// Override options for one export run.
#[derive(Debug, Clone, Default)]
pub struct ExportOverrides {
    /// Explicit output filename
    pub filename: Option<PathBuf>,

    /// Explicit template path
    pub template: Option<PathBuf>,

    /// Disable templating entirely
    pub disable_template: bool,

    /// Synthesize a default export when nothing is declared
    pub force: bool,

    /// Wrap the export into a zip archive
    pub zip: bool,

    /// Remove a pre-existing file at the output path before exporting
    pub clean: bool,

    /// Re-raise the first job failure after the batch finishes
    pub fail_fast: bool,
}

impl ExportOverrides {
    /// Whether any export-shaping override is present.
    ///
    /// Overrides express "do exactly one export": their presence
    /// truncates the resolved job list to at most one entry. The batch
    /// flags (`clean`, `fail_fast`) do not shape exports.
    fn constrains_single_export(&self) -> bool {
        self.filename.is_some()
            || self.template.is_some()
            || self.disable_template
            || self.force
            || self.zip
    }
}

/// Resolved template reference for a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateChoice {
    /// Templating disabled; the export is raw
    Disabled,
    /// No template declared; the format's default applies
    Default,
    /// Template file on disk
    Path(PathBuf),
    /// Opaque template identifier, resolved by the template engine
    Named(String),
}

impl TemplateChoice {
    /// Whether a template is in use for the job.
    pub fn in_use(&self) -> bool {
        !matches!(self, TemplateChoice::Disabled)
    }
}

/// One resolved, validated export job.
///
/// Immutable once produced by the resolver.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Source file this job was resolved from
    pub source: PathBuf,

    /// Target format
    pub format: ExportFormat,

    /// Resolved template reference
    pub template: TemplateChoice,

    /// Resolved, collision-free output path
    pub output: PathBuf,

    /// Article source paths, in declared order
    pub articles: Vec<PathBuf>,

    /// Sub-article source paths, in declared order
    pub sub_articles: Vec<PathBuf>,

    /// Renderer-specific options bag
    pub options: serde_json::Value,

    /// Whether the output is wrapped into a zip archive
    pub archive: bool,
}

/// Resolve all export jobs for a source file.
///
/// Reads declared export entries from the document's front matter, or
/// from the project configuration when the source file is the project's
/// own config file. Entries that fail validation are dropped with
/// file-scoped diagnostics; conflicting override options abort resolution
/// before any job is produced.
pub fn resolve_jobs(
    ctx: &ExportContext,
    source: &Path,
    front_matter: &FrontMatter,
    formats: &[ExportFormat],
    project: Option<&ProjectScope>,
) -> Result<Vec<ExportJob>> {
    let overrides = &ctx.overrides;
    if overrides.disable_template && overrides.template.is_some() {
        return Err(ExportError::config(
            "Cannot combine an explicit template with disabled templating",
        ));
    }

    let mut entries: Vec<ExportEntry> =
        if let Some(scope) = project.filter(|p| p.is_config_file(source)) {
            scope.exports.clone()
        } else {
            front_matter.exports.clone()
        };

    if !formats.is_empty() {
        entries.retain(|e| formats.contains(&e.format));
    }

    if entries.is_empty()
        && overrides.force
        && let Some(first) = formats.first()
    {
        debug!(format = %first, "nothing declared, synthesizing default export");
        entries.push(ExportEntry::default_for(*first));
    }

    // Overrides express "do exactly one export"
    if overrides.constrains_single_export() {
        entries.truncate(1);
    }

    let source_dir = source.parent().unwrap_or(Path::new("."));
    let mut jobs = Vec::new();
    for entry in entries {
        if let Some(job) = resolve_entry(ctx, source, source_dir, entry) {
            jobs.push(job);
        }
    }

    dedup_output_paths(&mut jobs);

    debug!(
        source = %source.display(),
        jobs = jobs.len(),
        "export resolution finished"
    );
    Ok(jobs)
}

/// Resolve one declared entry into a job, or drop it with diagnostics.
fn resolve_entry(
    ctx: &ExportContext,
    source: &Path,
    source_dir: &Path,
    entry: ExportEntry,
) -> Option<ExportJob> {
    let overrides = &ctx.overrides;
    let format = entry.format;

    let declared_articles = entry.articles.unwrap_or_else(|| {
        if is_content_source(source) {
            vec![source.to_path_buf()]
        } else {
            Vec::new()
        }
    });

    let mut articles = Vec::new();
    for article in declared_articles {
        let resolved = resolve_relative(source_dir, &article);
        if resolved.exists() {
            articles.push(resolved);
        } else {
            ctx.report(
                source,
                DiagnosticMessage::warning("Missing article")
                    .add_detail(format!("`{}` does not exist", resolved.display())),
            );
        }
    }

    let mut sub_articles = Vec::new();
    for sub in entry.sub_articles {
        let resolved = resolve_relative(source_dir, &sub);
        if resolved.exists() {
            sub_articles.push(resolved);
        } else {
            ctx.report(
                source,
                DiagnosticMessage::warning("Missing sub-article")
                    .add_detail(format!("`{}` does not exist", resolved.display())),
            );
        }
    }

    if articles.is_empty() && !format.bundles_without_articles() {
        if !overrides.force {
            ctx.report(
                source,
                DiagnosticMessage::warning(format!(
                    "Skipping {} export: no articles resolved",
                    format
                )),
            );
        }
        return None;
    }

    // Output path precedence: override filename, declared output,
    // format default folder
    let mut output = if let Some(filename) = &overrides.filename {
        resolve_relative(source_dir, filename)
    } else if let Some(declared) = &entry.output {
        resolve_relative(source_dir, declared)
    } else {
        source_dir.join(format.default_folder())
    };

    if output.extension().is_none() {
        let stem = articles
            .first()
            .and_then(|a| a.file_stem())
            .or_else(|| source.file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or("export");
        output.push(format!("{}.{}", stem, format.extension()));
    }

    let ends_zip = path_extension_is(&output, "zip");
    let mut archive = format.is_archive() || (format.supports_archive() && ends_zip);
    if !archive && overrides.zip && format.supports_archive() {
        archive = true;
        output.set_extension("zip");
    }

    let expected = if archive { "zip" } else { format.extension() };
    if !path_extension_is(&output, expected) {
        ctx.report(
            source,
            DiagnosticMessage::error("Wrong output extension")
                .with_problem(format!("The output path must end with `.{}`", expected))
                .add_detail(format!("Found `{}`", output.display())),
        );
        return None;
    }

    // Template precedence: disable flag, override path, declared reference
    let template = if overrides.disable_template {
        TemplateChoice::Disabled
    } else if let Some(path) = &overrides.template {
        TemplateChoice::Path(resolve_relative(source_dir, path))
    } else if let Some(declared) = &entry.template {
        let candidate = source_dir.join(declared);
        if candidate.exists() {
            TemplateChoice::Path(candidate)
        } else {
            TemplateChoice::Named(declared.clone())
        }
    } else {
        TemplateChoice::Default
    };

    debug!(
        format = %format,
        output = %output.display(),
        articles = articles.len(),
        archive,
        "resolved export job"
    );

    Some(ExportJob {
        source: source.to_path_buf(),
        format,
        template,
        output,
        articles,
        sub_articles,
        options: entry.options,
        archive,
    })
}

fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn path_extension_is(path: &Path, expected: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(expected))
}

/// Disambiguate identical output paths across the batch.
///
/// The first occupant keeps the bare name; later collisions get `_1`,
/// `_2`, ... inserted before the extension, in declaration order.
fn dedup_output_paths(jobs: &mut [ExportJob]) {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    for job in jobs.iter_mut() {
        if seen.insert(job.output.clone()) {
            continue;
        }

        let dir = job
            .output
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let stem = job
            .output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("export")
            .to_string();
        let ext = job
            .output
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let mut n = 1usize;
        loop {
            let candidate = dir.join(format!("{}_{}.{}", stem, n, ext));
            if seen.insert(candidate.clone()) {
                job.output = candidate;
                break;
            }
            n += 1;
        }
    }
}
