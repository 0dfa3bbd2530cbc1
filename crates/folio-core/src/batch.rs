/*
 * batch.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Concurrent execution of a batch of export jobs.
 */

//! Batch execution.
//!
//! All jobs resolved for one source file run concurrently, each on its own
//! task over data it owns. Every job gets an independent result slot;
//! sibling failures never stop a job. Failures surface in the aggregate
//! outcome, except in fail-fast mode where the first failure (in job
//! order) is re-raised once every job has finished.

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::compile::{CompilationResult, compile_job};
use crate::context::ExportContext;
use crate::error::{ExportError, Result};
use crate::resolve::ExportJob;

/// Outcome of one job within a batch.
#[derive(Debug)]
pub struct JobOutcome {
    /// The job that ran
    pub job: ExportJob,
    /// Its result
    pub result: Result<CompilationResult>,
}

/// Aggregate outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Per-job outcomes, in original job order
    pub jobs: Vec<JobOutcome>,
}

impl BatchOutcome {
    /// Number of jobs that succeeded.
    pub fn succeeded(&self) -> usize {
        self.jobs.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of jobs that failed.
    pub fn failed(&self) -> usize {
        self.jobs.len() - self.succeeded()
    }

    /// Temporary resources from every successful job, for the caller to
    /// reclaim.
    pub fn temp_resources(&self) -> Vec<&std::path::Path> {
        self.jobs
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .flat_map(|r| r.temp_resources.iter().map(|p| p.as_path()))
            .collect()
    }
}

/// Run all jobs for a source file concurrently.
///
/// Each job owns independent copies of the documents it touches; the
/// shared context only carries collaborators and the diagnostic channel.
pub async fn run_batch(ctx: &ExportContext, jobs: Vec<ExportJob>) -> Result<BatchOutcome> {
    let count = jobs.len();
    info!(jobs = count, "running export batch");

    let mut set = JoinSet::new();
    for (idx, job) in jobs.into_iter().enumerate() {
        let ctx = ctx.clone();
        set.spawn(async move {
            let result = compile_job(&ctx, &job).await;
            if let Err(e) = &result {
                warn!(source = %job.source.display(), error = %e, "export job failed");
                ctx.error_file(&job.source, e.to_string());
            }
            (idx, job, result)
        });
    }

    let mut slots: Vec<Option<JobOutcome>> = (0..count).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        let (idx, job, result) =
            joined.map_err(|e| ExportError::other(format!("export task failed: {}", e)))?;
        slots[idx] = Some(JobOutcome { job, result });
    }
    let mut outcomes: Vec<JobOutcome> = slots.into_iter().flatten().collect();

    if ctx.overrides.fail_fast
        && let Some(i) = outcomes.iter().position(|o| o.result.is_err())
        && let Err(e) = outcomes.swap_remove(i).result
    {
        return Err(e);
    }

    Ok(BatchOutcome { jobs: outcomes })
}
