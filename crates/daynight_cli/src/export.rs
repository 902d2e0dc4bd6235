//! Report and selection export.
//!
//! Every writer goes through a buffered file handle that is flushed before
//! the function returns; the handle closes when it drops, on error paths too.

use std::path::Path;

use daynight_core::{DistributionReport, GroupKind, Hour};
use serde::Serialize;

use crate::error::RunError;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/markdown.rs"]
mod markdown;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// One selected file, as written to `selection.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionRow {
    pub group: GroupKind,
    pub hour: Hour,
    pub file_name: String,
}

/// Write the markdown report.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_report_markdown(
    report: &DistributionReport,
    path: impl AsRef<Path>,
) -> Result<(), RunError> {
    let path = path.as_ref();
    let writer = writer_utils::create_output_file(path)?;
    markdown::write_markdown_impl(report, writer, path)
}

/// Write the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be created or serialization fails.
pub fn write_report_json(
    report: &DistributionReport,
    path: impl AsRef<Path>,
) -> Result<(), RunError> {
    let path = path.as_ref();
    let writer = writer_utils::create_output_file(path)?;
    json::write_json_impl(report, writer, path)
}

/// Write one `group,hour,file_name` row per selected file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or CSV writing fails.
pub fn write_selection_csv(rows: &[SelectionRow], path: impl AsRef<Path>) -> Result<(), RunError> {
    let path = path.as_ref();
    let writer = writer_utils::create_output_file(path)?;
    csv::write_selection_impl(rows, writer, path)
}

#[cfg(test)]
mod tests {
    use daynight_core::{BucketReport, GroupReport};
    use tempfile::NamedTempFile;

    use super::*;

    fn hour(value: u8) -> Hour {
        Hour::new(value).unwrap()
    }

    fn report() -> DistributionReport {
        DistributionReport {
            dataset: "CAM_BACK".to_string(),
            generated_at: "20240101_00_00_00".to_string(),
            groups: vec![GroupReport {
                kind: GroupKind::Night,
                buckets: vec![BucketReport {
                    hour: hour(2),
                    selected: 1,
                    available: 3,
                }],
                requested: 1,
                target: 1,
                total_selected: 1,
                total_available: 3,
            }],
            total_images: 3,
            skipped_images: 0,
            ignored_files: 0,
            full_copy_grouping: None,
            seed: Some(1),
            config_fingerprint: "f00d".to_string(),
        }
    }

    #[test]
    fn test_write_report_markdown() {
        let file = NamedTempFile::new().unwrap();
        write_report_markdown(&report(), file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.starts_with("## Image Distribution Report"));
        assert!(contents.contains("- Time slot 2:00: 1/3 images selected."));
    }

    #[test]
    fn test_write_report_json() {
        let file = NamedTempFile::new().unwrap();
        write_report_json(&report(), file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let parsed: DistributionReport = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, report());
    }

    #[test]
    fn test_write_selection_csv() {
        let file = NamedTempFile::new().unwrap();
        let rows = vec![
            SelectionRow {
                group: GroupKind::Day,
                hour: hour(7),
                file_name: "a-b-c-d-07.jpg".to_string(),
            },
            SelectionRow {
                group: GroupKind::Night,
                hour: hour(23),
                file_name: "a-b-c-d-23.jpg".to_string(),
            },
        ];
        write_selection_csv(&rows, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(
            contents,
            "group,hour,file_name\nday,7,a-b-c-d-07.jpg\nnight,23,a-b-c-d-23.jpg\n"
        );
    }

    #[test]
    fn test_writer_reports_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let error = write_report_json(&report(), dir.path().join("missing").join("report.json"))
            .expect_err("should fail");
        assert!(matches!(error, RunError::Io { .. }));
    }
}
