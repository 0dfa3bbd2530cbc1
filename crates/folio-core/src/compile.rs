/*
 * compile.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-job compilation orchestration.
 */

//! Compilation orchestration.
//!
//! [`compile_job`] drives one export job end to end:
//! finalize → extract → render → merge → assemble → package.
//!
//! Articles finalize and render concurrently, one task and one result
//! slot per article; assembly re-sorts by declaration index so output is
//! deterministic regardless of completion order. Extraction runs
//! sequentially in declaration order because part values are
//! first-writer-wins across articles.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hashlink::LinkedHashMap;
use tokio::task::JoinSet;
use tracing::{debug, info};

use folio_error_reporting::DiagnosticMessage;

use crate::collab::{RenderStyle, Rendered};
use crate::context::ExportContext;
use crate::document::SourceDocument;
use crate::error::{ExportError, Result};
use crate::extract::{PartValue, extract_part, extract_tagged};
use crate::resolve::ExportJob;
use crate::sidedata::TemplateSideData;

/// Result of compiling one export job.
#[derive(Debug)]
pub struct CompilationResult {
    /// Temporary resources created for this job, owned by the caller to
    /// reclaim (scratch directories from archive packaging)
    pub temp_resources: Vec<PathBuf>,

    /// Final output paths, primary first
    pub outputs: Vec<PathBuf>,

    /// Whether glossary content was present in the job's side-data
    pub has_glossary: bool,
}

/// Compile one export job.
pub async fn compile_job(ctx: &ExportContext, job: &ExportJob) -> Result<CompilationResult> {
    info!(
        source = %job.source.display(),
        format = %job.format,
        output = %job.output.display(),
        "compiling export job"
    );

    let template_in_use = job.template.in_use();

    if ctx.overrides.clean {
        match tokio::fs::remove_file(&job.output).await {
            Ok(()) => debug!(output = %job.output.display(), "removed stale output"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(parent) = job.output.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // Archive jobs render into a private scratch directory; everything in
    // it is bundled to the real output path at the end.
    let scratch = if job.archive {
        Some(
            tempfile::Builder::new()
                .prefix("folio-export-")
                .tempdir()?
                .keep(),
        )
    } else {
        None
    };

    let (work_dir, work_output) = match &scratch {
        Some(scratch_dir) => {
            let stem = job
                .output
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("export");
            let name = format!("{}.{}", stem, job.format.content_extension());
            (scratch_dir.clone(), scratch_dir.join(name))
        }
        None => {
            let dir = job
                .output
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            (dir, job.output.clone())
        }
    };

    if template_in_use {
        ctx.templates.ensure_available(&job.template).await?;
    }

    let mut docs = finalize_articles(ctx, job).await?;

    let style = RenderStyle {
        template_styles: template_in_use.then(|| ctx.templates.style_options()),
        // Only the template path permits a glossary-printing pass
        print_glossaries: template_in_use,
        emit_glossaries: true,
        options: job.options.clone(),
    };

    let source = job.source.clone();
    let mut on_conflict = |key: &str| {
        ctx.report(
            &source,
            DiagnosticMessage::warning("Conflicting definition")
                .add_detail(format!("`{}` was overwritten while merging", key)),
        );
    };

    let mut parts: LinkedHashMap<String, PartValue> = LinkedHashMap::new();
    let mut merged = TemplateSideData::new();

    if template_in_use {
        let part_specs = ctx.templates.part_specs();
        let tag_specs = ctx.templates.tag_specs();

        for doc in docs.iter_mut() {
            for spec in &part_specs {
                let value = extract_part(
                    doc,
                    spec,
                    ctx.renderer.as_ref(),
                    &style,
                    &mut merged,
                    &mut on_conflict,
                )
                .await?;
                if let Some(value) = value {
                    if parts.contains_key(&spec.id) {
                        ctx.report(
                            &doc.path,
                            DiagnosticMessage::warning("Duplicate part value").add_detail(
                                format!("part `{}` already has a value, keeping the first", spec.id),
                            ),
                        );
                    } else {
                        parts.insert(spec.id.clone(), value);
                    }
                }
            }

            for tag in &tag_specs {
                let fragment = extract_tagged(
                    doc,
                    tag,
                    ctx.renderer.as_ref(),
                    &style,
                    &mut merged,
                    &mut on_conflict,
                )
                .await?;
                if let Some(fragment) = fragment {
                    match parts.get_mut(&tag.name) {
                        None => {
                            parts.insert(tag.name.clone(), PartValue::Single(fragment));
                        }
                        Some(PartValue::Single(existing)) => {
                            existing.text.push_str("\n\n");
                            existing.text.push_str(&fragment.text);
                            existing
                                .side_data
                                .merge_from(&fragment.side_data, &mut on_conflict);
                        }
                        Some(PartValue::List(_)) => {
                            ctx.report(
                                &doc.path,
                                DiagnosticMessage::warning("Duplicate part value").add_detail(
                                    format!(
                                        "tag `{}` collides with an extracted part, keeping the first",
                                        tag.name
                                    ),
                                ),
                            );
                        }
                    }
                }
            }
        }
    }

    let bibliography = docs.iter().any(|d| !d.references.is_empty());
    let pairs = render_articles(ctx, docs, &style).await?;

    for (_, rendered) in &pairs {
        merged.merge_from(&rendered.side_data, &mut on_conflict);
    }
    // Glossary presence is tracked and reported even for raw exports
    // that never print glossaries.
    let has_glossary = merged.print_glossaries || merged.has_glossary_content();

    let mut outputs = vec![job.output.clone()];
    let body = match pairs.as_slice() {
        [] => String::new(),
        [(_, rendered)] => rendered.text.clone(),
        _ => {
            assemble_articles(ctx, job, &pairs, &work_dir, &work_output, &mut outputs).await?
        }
    };

    if pairs.is_empty() {
        // Archive of co-located exports only: nothing of our own to write
    } else if template_in_use {
        let front_matter = &pairs[0].0.front_matter;
        ctx.templates
            .substitute(
                &body,
                &parts,
                &merged,
                front_matter,
                bibliography,
                &work_output,
            )
            .await?;
    } else {
        tokio::fs::write(&work_output, body.as_bytes()).await?;
    }

    let mut temp_resources = Vec::new();
    if let Some(scratch_dir) = scratch {
        ctx.archiver.bundle(&scratch_dir, &job.output).await?;
        // The scratch directory is handed back for the caller to reclaim
        temp_resources.push(scratch_dir);
        outputs.truncate(1);
    }

    info!(output = %job.output.display(), "export job finished");
    Ok(CompilationResult {
        temp_resources,
        outputs,
        has_glossary,
    })
}

/// Finalize every article concurrently, re-sorted by declaration index.
async fn finalize_articles(ctx: &ExportContext, job: &ExportJob) -> Result<Vec<SourceDocument>> {
    let mut set = JoinSet::new();
    for (idx, path) in job.articles.iter().enumerate() {
        let finalizer = Arc::clone(&ctx.finalizer);
        let path = path.clone();
        set.spawn(async move { (idx, finalizer.finalize(&path).await) });
    }

    let mut slots: Vec<Option<SourceDocument>> = job.articles.iter().map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        let (idx, result) = joined
            .map_err(|e| ExportError::other(format!("finalize task failed: {}", e)))?;
        let finalized = result?;
        for warning in finalized.warnings {
            ctx.report(&finalized.document.path, warning);
        }
        slots[idx] = Some(finalized.document);
    }

    Ok(slots.into_iter().flatten().collect())
}

/// Render every article body concurrently, re-sorted by declaration index.
async fn render_articles(
    ctx: &ExportContext,
    docs: Vec<SourceDocument>,
    style: &RenderStyle,
) -> Result<Vec<(SourceDocument, Rendered)>> {
    let count = docs.len();
    let mut set = JoinSet::new();
    for (idx, doc) in docs.into_iter().enumerate() {
        let renderer = Arc::clone(&ctx.renderer);
        let style = style.clone();
        set.spawn(async move {
            let rendered = renderer
                .render(&doc.tree, &doc.references, &doc.front_matter, &style)
                .await;
            (idx, doc, rendered)
        });
    }

    let mut slots: Vec<Option<(SourceDocument, Rendered)>> = (0..count).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        let (idx, doc, result) =
            joined.map_err(|e| ExportError::other(format!("render task failed: {}", e)))?;
        slots[idx] = Some((doc, result?));
    }

    Ok(slots.into_iter().flatten().collect())
}

/// Write one auxiliary file per article and build the top-level body that
/// references them in article order.
async fn assemble_articles(
    ctx: &ExportContext,
    job: &ExportJob,
    pairs: &[(SourceDocument, Rendered)],
    work_dir: &Path,
    work_output: &Path,
    outputs: &mut Vec<PathBuf>,
) -> Result<String> {
    let stem = work_output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("export");
    let ext = work_output
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_else(|| job.format.extension());

    let mut used_names: std::collections::HashSet<String> = std::collections::HashSet::new();
    let mut references = Vec::new();

    for (i, (doc, rendered)) in pairs.iter().enumerate() {
        let label = if doc.slug.is_empty() {
            (i + 1).to_string()
        } else {
            doc.slug.clone()
        };
        let mut aux_name = format!("{}_{}.{}", stem, label, ext);
        if !used_names.insert(aux_name.clone()) {
            aux_name = format!("{}_{}_{}.{}", stem, label, i + 1, ext);
            used_names.insert(aux_name.clone());
        }
        let aux_path = work_dir.join(&aux_name);

        let mut content = String::new();
        if !doc.front_matter.content_includes_title {
            let title = doc
                .front_matter
                .title
                .clone()
                .unwrap_or_else(|| label.clone());
            content.push_str(&ctx.renderer.section_heading(&title));
            content.push_str("\n\n");
        }
        content.push_str(&rendered.text);

        tokio::fs::write(&aux_path, content.as_bytes()).await?;
        debug!(aux = %aux_path.display(), "wrote auxiliary article file");
        outputs.push(aux_path);

        references.push(ctx.renderer.file_reference(Path::new(&aux_name)));
    }

    Ok(references.join("\n"))
}
