//! Run orchestration.
//!
//! A run is split into a planning step that performs every fatal check and
//! every sampling decision without touching the output location, and an
//! execution step that creates the output tree, copies files and writes the
//! exports. A run rejected during planning leaves no output behind.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use daynight_core::{
    classify_file_name, config_fingerprint, distribute, rng_from_seed, BucketIndex, Distribution,
    DistributionReport, GroupKind, GroupReport, Hour,
};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::{FullCopyMode, RunConfig};
use crate::copy::{copy_files, CopyJob};
use crate::error::RunError;
use crate::export::{write_report_json, write_report_markdown, write_selection_csv, SelectionRow};
use crate::layout::OutputLayout;
use crate::scan::{dataset_name, scan_source};

/// Timestamp format used for the output root name and the report.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H_%M_%S";

/// Sampled files of one group.
#[derive(Debug, Clone)]
pub struct GroupSelection {
    pub kind: GroupKind,
    pub distribution: Distribution<Hour, String>,
}

/// Everything decided before the first write.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub index: BucketIndex,
    pub selections: Vec<GroupSelection>,
    pub report: DistributionReport,
}

impl RunPlan {
    pub fn selection(&self, kind: GroupKind) -> Option<&GroupSelection> {
        self.selections
            .iter()
            .find(|selection| selection.kind == kind)
    }

    /// One row per selected file, grouped by day/night in selection order.
    pub fn selection_rows(&self) -> Result<Vec<SelectionRow>, RunError> {
        let mut rows = Vec::new();
        for selection in &self.selections {
            for file_name in &selection.distribution.selected {
                rows.push(SelectionRow {
                    group: selection.kind,
                    hour: classify_file_name(file_name)?,
                    file_name: file_name.clone(),
                });
            }
        }
        Ok(rows)
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub output_root: PathBuf,
    pub report: DistributionReport,
    pub subset_copied: usize,
    pub full_copied: usize,
}

fn sample_count(config: &RunConfig, kind: GroupKind) -> usize {
    match kind {
        GroupKind::Day => config.sample_count_day,
        GroupKind::Night => config.sample_count_night,
    }
}

/// Validate, scan, classify and sample. Nothing is written.
pub fn plan_run<R: Rng>(
    config: &RunConfig,
    generated_at: &str,
    rng: &mut R,
) -> Result<RunPlan, RunError> {
    config.validate()?;

    let listing = scan_source(&config.source_dir, &config.image_extensions)?;
    info!(
        images = listing.images.len(),
        ignored = listing.ignored.len(),
        source = %config.source_dir.display(),
        "scanned source directory"
    );
    let ignored_files = listing.ignored.len();

    let index = BucketIndex::build(listing.images, config.parse_policy)?;
    if !index.skipped().is_empty() {
        let skipped = index.skipped().len();
        warn!(skipped, "malformed file names were skipped");
    }
    if index.total() == 0 {
        let source = config.source_dir.display();
        return Err(RunError::Configuration(format!(
            "no image in '{source}' has a readable capture hour"
        )));
    }
    for (hour, names) in index.buckets() {
        debug!(%hour, images = names.len(), "hour bucket");
    }

    let mut selections = Vec::with_capacity(GroupKind::ALL.len());
    let mut groups = Vec::with_capacity(GroupKind::ALL.len());
    for kind in GroupKind::ALL {
        let hours = config.partition.hours(kind);
        let requested = sample_count(config, kind);
        let distribution = distribute(&hours, index.buckets(), requested, rng);
        info!(
            group = kind.label(),
            requested,
            selected = distribution.selected_count(),
            available = index.available_in(&hours),
            "sampled group"
        );

        groups.push(GroupReport::from_distribution(kind, &hours, &index, &distribution));
        selections.push(GroupSelection { kind, distribution });
    }

    let report = DistributionReport {
        dataset: dataset_name(&config.source_dir),
        generated_at: generated_at.to_string(),
        groups,
        total_images: index.total(),
        skipped_images: index.skipped().len(),
        ignored_files,
        full_copy_grouping: config.full_copy_mode.grouping_label().map(str::to_string),
        seed: config.seed,
        config_fingerprint: config_fingerprint(config)?,
    };

    Ok(RunPlan {
        index,
        selections,
        report,
    })
}

fn copy_jobs(source_dir: &Path, target_dir: &Path, names: &[String]) -> Vec<CopyJob> {
    names
        .iter()
        .map(|name| CopyJob::new(source_dir.join(name), target_dir.join(name)))
        .collect()
}

fn full_copy_jobs(config: &RunConfig, plan: &RunPlan, layout: &OutputLayout) -> Vec<CopyJob> {
    if config.full_copy_mode == FullCopyMode::None {
        return Vec::new();
    }

    let mut jobs = Vec::new();
    for (hour, names) in plan.index.buckets() {
        let target_dir = match config.full_copy_mode {
            FullCopyMode::ByHour => layout.full_hour_dir(*hour),
            _ => layout.full_group_dir(config.partition.group_of(*hour)),
        };
        jobs.extend(copy_jobs(&config.source_dir, &target_dir, names));
    }
    jobs
}

/// Create the output tree, copy the sampled (and optionally all) files and
/// write the exports. The markdown report is written last.
pub fn execute_plan(
    config: &RunConfig,
    plan: &RunPlan,
    layout: &OutputLayout,
) -> Result<RunOutcome, RunError> {
    let hours: Vec<Hour> = plan.index.buckets().keys().copied().collect();
    layout.create(config.full_copy_mode, &hours)?;
    info!(root = %layout.root().display(), "created output tree");

    let mut subset_copied = 0;
    for selection in &plan.selections {
        let target_dir = layout.subset_dir(selection.kind);
        let selected = &selection.distribution.selected;
        let jobs = copy_jobs(&config.source_dir, &target_dir, selected);
        let label = format!("Copying {} files", selection.kind.dir_name());
        subset_copied += copy_files(&jobs, &label, config.copy_threads, config.show_progress)?;
    }

    let full_jobs = full_copy_jobs(config, plan, layout);
    let full_copied = copy_files(
        &full_jobs,
        "Copying full dataset",
        config.copy_threads,
        config.show_progress,
    )?;

    write_selection_csv(&plan.selection_rows()?, layout.selection_csv_path())?;
    write_report_json(&plan.report, layout.report_json_path())?;
    write_report_markdown(&plan.report, layout.report_markdown_path())?;
    info!(
        subset = subset_copied,
        full = full_copied,
        report = %layout.report_markdown_path().display(),
        "run complete"
    );

    Ok(RunOutcome {
        output_root: layout.root().to_path_buf(),
        report: plan.report.clone(),
        subset_copied,
        full_copied,
    })
}

/// Run end to end, writing into `<output_dir>/classified_<timestamp>`.
pub fn run(config: &RunConfig, started_at: DateTime<Local>) -> Result<RunOutcome, RunError> {
    let stamp = started_at.format(TIMESTAMP_FORMAT).to_string();
    let mut rng = rng_from_seed(config.seed);

    let plan = plan_run(config, &stamp, &mut rng)?;
    let layout = OutputLayout::for_run(&config.output_dir, &stamp);
    execute_plan(config, &plan, &layout)
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use daynight_core::ParsePolicy;

    use super::*;

    fn dataset(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            File::create(dir.path().join(name)).unwrap();
        }
        dir
    }

    fn plan(config: &RunConfig) -> Result<RunPlan, RunError> {
        plan_run(config, "stamp", &mut rng_from_seed(Some(1)))
    }

    #[test]
    fn plan_samples_both_groups_without_writing() {
        let source = dataset(&[
            "n-2018-07-18-06-00.jpg",
            "n-2018-07-18-07-00.jpg",
            "n-2018-07-18-23-00.jpg",
            "notes.txt",
        ]);
        let config = RunConfig::new(source.path())
            .with_sample_counts(1, 5)
            .with_seed(1);

        let plan = plan(&config).unwrap();

        let day = plan.selection(GroupKind::Day).unwrap();
        let night = plan.selection(GroupKind::Night).unwrap();
        assert_eq!(day.distribution.selected_count(), 1);
        assert_eq!(night.distribution.selected, ["n-2018-07-18-23-00.jpg"]);
        assert!(night.distribution.was_clamped());
        assert_eq!(plan.report.total_images, 3);
        assert_eq!(plan.report.ignored_files, 1);
        assert_eq!(plan.report.generated_at, "stamp");
        assert_eq!(plan.selection_rows().unwrap().len(), 2);
        assert_eq!(std::fs::read_dir(source.path()).unwrap().count(), 4);
    }

    #[test]
    fn plan_rejects_malformed_names_in_strict_mode() {
        let source = dataset(&["n-2018-07-18-06-00.jpg", "broken.jpg"]);
        let config = RunConfig::new(source.path());

        let error = plan(&config).expect_err("should fail");
        assert!(matches!(error, RunError::Parse(_)));
    }

    #[test]
    fn plan_skips_malformed_names_when_lenient() {
        let source = dataset(&["n-2018-07-18-06-00.jpg", "broken.jpg"]);
        let config = RunConfig::new(source.path()).with_parse_policy(ParsePolicy::SkipAndWarn);

        let plan = plan(&config).unwrap();
        assert_eq!(plan.report.total_images, 1);
        assert_eq!(plan.report.skipped_images, 1);
    }

    #[test]
    fn plan_fails_when_nothing_is_classifiable() {
        let source = dataset(&["broken.jpg"]);
        let config = RunConfig::new(source.path()).with_parse_policy(ParsePolicy::SkipAndWarn);

        let error = plan(&config).expect_err("should fail");
        assert!(error.is_configuration());
    }

    #[test]
    fn full_copy_jobs_follow_mode() {
        let source = dataset(&["n-2018-07-18-06-00.jpg", "n-2018-07-18-23-00.jpg"]);
        let layout = OutputLayout::new("/out");
        let config = RunConfig::new(source.path()).with_full_copy_mode(FullCopyMode::ByHour);
        let plan = plan(&config).unwrap();

        let jobs = full_copy_jobs(&config, &plan, &layout);
        assert_eq!(jobs.len(), 2);
        assert_eq!(
            jobs[1].to,
            PathBuf::from("/out/full/timeslots/23/n-2018-07-18-23-00.jpg")
        );

        let config = config.with_full_copy_mode(FullCopyMode::ByDayNight);
        let jobs = full_copy_jobs(&config, &plan, &layout);
        assert_eq!(
            jobs[0].to,
            PathBuf::from("/out/full/daytime/n-2018-07-18-06-00.jpg")
        );

        let config = config.with_full_copy_mode(FullCopyMode::None);
        assert!(full_copy_jobs(&config, &plan, &layout).is_empty());
    }
}
