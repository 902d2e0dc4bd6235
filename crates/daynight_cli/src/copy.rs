//! Parallel copy phase.
//!
//! Each job has its own source and destination, so jobs run on a rayon pool
//! with no shared state besides the progress bar.

use std::fs;
use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::info;

use crate::error::RunError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyJob {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl CopyJob {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

fn progress_bar(label: &str, total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "{msg} {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    bar.set_message(label.to_string());
    bar
}

/// Copy every job, failing on the first error.
///
/// # Arguments
///
/// * `jobs` - Files to copy
/// * `label` - Progress bar and log label
/// * `num_threads` - Optional number of threads to use. If None, uses rayon's default.
/// * `show_progress` - Whether to display a progress bar
///
/// # Returns
///
/// The number of files copied.
pub fn copy_files(
    jobs: &[CopyJob],
    label: &str,
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<usize, RunError> {
    if jobs.is_empty() {
        return Ok(0);
    }

    let pb = show_progress.then(|| progress_bar(label, jobs.len()));

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder
        .build()
        .map_err(|error| RunError::ThreadPool(error.to_string()))?;

    let pb_clone = pb.clone();
    let result: Result<(), RunError> = pool.install(|| {
        jobs.par_iter().try_for_each(|job| {
            fs::copy(&job.from, &job.to).map_err(|source| RunError::Copy {
                from: job.from.clone(),
                to: job.to.clone(),
                source,
            })?;
            if let Some(ref progress_bar) = pb_clone {
                progress_bar.inc(1);
            }
            Ok(())
        })
    });

    if let Some(ref progress_bar) = pb {
        match result {
            Ok(()) => progress_bar.finish_with_message(format!("{label}: done")),
            Err(_) => progress_bar.abandon_with_message(format!("{label}: failed")),
        }
    }
    result?;

    info!(files = jobs.len(), label, "copy phase complete");
    Ok(jobs.len())
}
