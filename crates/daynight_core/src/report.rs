//! Typed distribution report and its renderings.
//!
//! The report is built once from the bucket index and the per-group
//! distributions; renderers only read it.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::classify::{BucketIndex, Hour};
use crate::distribute::Distribution;
use crate::partition::GroupKind;

/// Selected and available counts for one hour bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketReport {
    pub hour: Hour,
    pub selected: usize,
    pub available: usize,
}

/// Per-group section of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    pub kind: GroupKind,
    pub buckets: Vec<BucketReport>,
    pub requested: usize,
    pub target: usize,
    pub total_selected: usize,
    pub total_available: usize,
}

impl GroupReport {
    /// Summarize `distribution` for every hour in `hours`, including hours
    /// that contributed nothing.
    pub fn from_distribution(
        kind: GroupKind,
        hours: &[Hour],
        index: &BucketIndex,
        distribution: &Distribution<Hour, String>,
    ) -> Self {
        let buckets: Vec<BucketReport> = hours
            .iter()
            .map(|hour| BucketReport {
                hour: *hour,
                selected: distribution.per_bucket.get(hour).copied().unwrap_or(0),
                available: index.available(*hour),
            })
            .collect();

        Self {
            kind,
            total_selected: buckets.iter().map(|bucket| bucket.selected).sum(),
            total_available: buckets.iter().map(|bucket| bucket.available).sum(),
            buckets,
            requested: distribution.requested,
            target: distribution.target,
        }
    }

    pub fn was_clamped(&self) -> bool {
        self.target < self.requested
    }
}

/// Everything a run reports about its selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionReport {
    /// Name of the source dataset (last component of the source path).
    pub dataset: String,
    /// Run timestamp, `%Y%m%d_%H_%M_%S`.
    pub generated_at: String,
    pub groups: Vec<GroupReport>,
    /// Classified images in the dataset.
    pub total_images: usize,
    /// Images dropped because their name could not be classified.
    pub skipped_images: usize,
    /// Files in the source directory without an image extension.
    pub ignored_files: usize,
    /// Description of the full-copy grouping, when a full copy was made.
    pub full_copy_grouping: Option<String>,
    pub seed: Option<u64>,
    pub config_fingerprint: String,
}

impl DistributionReport {
    pub fn group(&self, kind: GroupKind) -> Option<&GroupReport> {
        self.groups.iter().find(|group| group.kind == kind)
    }

    pub fn total_selected(&self) -> usize {
        self.groups.iter().map(|group| group.total_selected).sum()
    }
}

/// Hex SHA-256 of the stable JSON form of `value`.
pub fn config_fingerprint(value: impl Serialize) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(&value)?;
    let mut hasher = Sha256::new();
    hasher.update(json);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Render the `report.md` document.
pub fn render_markdown(report: &DistributionReport) -> String {
    let dataset = &report.dataset;
    let mut out = String::from("## Image Distribution Report\n\n");
    out.push_str(&format!("**Selected Dataset:** {dataset}\n\n"));

    for group in &report.groups {
        let label = group.kind.label();
        out.push_str(&format!("### {label} hours distribution:\n"));
        for bucket in &group.buckets {
            out.push_str(&format!(
                "- Time slot {}:00: {}/{} images selected.\n",
                bucket.hour, bucket.selected, bucket.available
            ));
        }
        out.push_str(&format!(
            "\n**{label} total:** {}/{} images selected.\n",
            group.total_selected, group.total_available
        ));
        if group.was_clamped() {
            out.push_str(&format!(
                "_Requested {}, clamped to {} available._\n",
                group.requested, group.target
            ));
        }
        out.push('\n');
    }

    let total = report.total_images;
    match &report.full_copy_grouping {
        Some(grouping) => out.push_str(&format!(
            "**Total images in dataset '{dataset}' is {total}:** The copied images are grouped by {grouping}.  \n"
        )),
        None => out.push_str(&format!("**Total images in dataset '{dataset}' is {total}**  \n")),
    }
    if report.skipped_images > 0 {
        let count = report.skipped_images;
        out.push_str(&format!("**Skipped malformed file names:** {count}  \n"));
    }
    if report.ignored_files > 0 {
        let count = report.ignored_files;
        out.push_str(&format!("**Ignored non-image files:** {count}  \n"));
    }
    if let Some(seed) = report.seed {
        out.push_str(&format!("**Sampling seed:** {seed}  \n"));
    }
    out.push_str("**Configuration fingerprint:** ");
    out.push_str(&report.config_fingerprint);
    out.push_str("  \n**Report Generation Date and Time:** ");
    out.push_str(&report.generated_at);
    out.push_str("\n\n");
    out
}

/// Render the plain summary printed at the end of a run.
pub fn render_console(report: &DistributionReport) -> String {
    let mut out = String::new();
    for group in &report.groups {
        let label = group.kind.label();
        out.push_str(&format!("{label} hours distribution:\n"));
        for bucket in &group.buckets {
            out.push_str(&format!(
                "Time slot {}:00: {}/{} images selected.\n",
                bucket.hour, bucket.selected, bucket.available
            ));
        }
        out.push_str(&format!(
            "{label} total: {}/{} images selected.\n",
            group.total_selected, group.total_available
        ));
    }
    match &report.full_copy_grouping {
        Some(grouping) => out.push_str(&format!(
            "Total images in dataset '{}' is {}: The copied images are grouped by {grouping}.\n",
            report.dataset, report.total_images
        )),
        None => out.push_str(&format!(
            "Total images in dataset '{}' is {}\n",
            report.dataset, report.total_images
        )),
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::classify::ParsePolicy;

    fn hour(value: u8) -> Hour {
        Hour::new(value).unwrap()
    }

    fn sample_report() -> DistributionReport {
        let index = BucketIndex::build(
            vec![
                "a-b-c-d-06xx-1.jpg".to_string(),
                "a-b-c-d-06xx-2.jpg".to_string(),
                "a-b-c-d-07xx-1.jpg".to_string(),
                "a-b-c-d-22xx-1.jpg".to_string(),
            ],
            ParsePolicy::Strict,
        )
        .unwrap();

        let day = Distribution {
            selected: vec!["a-b-c-d-06xx-1.jpg".to_string()],
            per_bucket: BTreeMap::from([(hour(6), 1)]),
            requested: 1,
            target: 1,
        };
        let night = Distribution {
            selected: vec!["a-b-c-d-22xx-1.jpg".to_string()],
            per_bucket: BTreeMap::from([(hour(22), 1)]),
            requested: 5,
            target: 1,
        };

        DistributionReport {
            dataset: "CAM_FRONT".to_string(),
            generated_at: "20231009_14_30_00".to_string(),
            groups: vec![
                GroupReport::from_distribution(GroupKind::Day, &[hour(6), hour(7)], &index, &day),
                GroupReport::from_distribution(GroupKind::Night, &[hour(22)], &index, &night),
            ],
            total_images: index.total(),
            skipped_images: 0,
            ignored_files: 0,
            full_copy_grouping: Some("daytime/nighttime".to_string()),
            seed: None,
            config_fingerprint: "abc123".to_string(),
        }
    }

    #[test]
    fn group_report_lists_every_hour() {
        let report = sample_report();
        let day = report.group(GroupKind::Day).unwrap();

        let rows: Vec<(u8, usize, usize)> = day
            .buckets
            .iter()
            .map(|bucket| (bucket.hour.value(), bucket.selected, bucket.available))
            .collect();
        assert_eq!(rows, vec![(6, 1, 2), (7, 0, 1)]);
        assert_eq!(day.total_selected, 1);
        assert_eq!(day.total_available, 3);
        assert_eq!(report.total_selected(), 2);
    }

    #[test]
    fn markdown_follows_report_layout() {
        let markdown = render_markdown(&sample_report());
        let expected = [
            "## Image Distribution Report",
            "",
            "**Selected Dataset:** CAM_FRONT",
            "",
            "### Daytime hours distribution:",
            "- Time slot 6:00: 1/2 images selected.",
            "- Time slot 7:00: 0/1 images selected.",
            "",
            "**Daytime total:** 1/3 images selected.",
            "",
            "### Nighttime hours distribution:",
            "- Time slot 22:00: 1/1 images selected.",
            "",
            "**Nighttime total:** 1/1 images selected.",
            "_Requested 5, clamped to 1 available._",
            "",
            "**Total images in dataset 'CAM_FRONT' is 4:** The copied images are grouped by daytime/nighttime.  ",
            "**Configuration fingerprint:** abc123  ",
            "**Report Generation Date and Time:** 20231009_14_30_00",
            "",
            "",
        ]
        .join("\n");
        assert_eq!(markdown, expected);
    }

    #[test]
    fn markdown_lists_skipped_and_ignored_files() {
        let mut report = sample_report();
        report.skipped_images = 2;
        report.ignored_files = 1;
        report.seed = Some(7);
        let markdown = render_markdown(&report);

        let tail = [
            "**Skipped malformed file names:** 2  ",
            "**Ignored non-image files:** 1  ",
            "**Sampling seed:** 7  ",
            "**Configuration fingerprint:** abc123  ",
        ]
        .join("\n");
        assert!(markdown.contains(&tail));
    }

    #[test]
    fn console_summary_without_full_copy() {
        let mut report = sample_report();
        report.full_copy_grouping = None;
        let summary = render_console(&report);

        let first_lines = "Daytime hours distribution:\nTime slot 6:00: 1/2";
        let night_total = "Nighttime total: 1/1 images selected.\n";
        let last_line = "Total images in dataset 'CAM_FRONT' is 4\n";
        assert!(summary.starts_with(first_lines));
        assert!(summary.contains(night_total));
        assert!(summary.ends_with(last_line));
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = sample_report();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"kind\":\"day\""));
        let parsed: DistributionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn fingerprint_is_stable_for_equal_values() {
        let a = config_fingerprint(BTreeMap::from([("day", 50), ("night", 50)])).unwrap();
        let b = config_fingerprint(BTreeMap::from([("day", 50), ("night", 50)])).unwrap();
        let c = config_fingerprint(BTreeMap::from([("day", 50), ("night", 40)])).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
