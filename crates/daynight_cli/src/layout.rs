//! Output tree of a run.
//!
//! ```text
//! classified_<timestamp>/
//!   subset/{daytime,nighttime}/
//!   full/{daytime,nighttime}/      (by-daynight)
//!   full/timeslots/<HH>/           (by-hour)
//!   report.md  report.json  selection.csv
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use daynight_core::{GroupKind, Hour};

use crate::config::FullCopyMode;
use crate::error::RunError;

pub const OUTPUT_ROOT_PREFIX: &str = "classified_";
pub const REPORT_MARKDOWN_FILE: &str = "report.md";
pub const REPORT_JSON_FILE: &str = "report.json";
pub const SELECTION_CSV_FILE: &str = "selection.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<output_dir>/classified_<stamp>`.
    pub fn for_run(output_dir: &Path, stamp: &str) -> Self {
        Self::new(output_dir.join(format!("{OUTPUT_ROOT_PREFIX}{stamp}")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn subset_dir(&self, kind: GroupKind) -> PathBuf {
        self.root.join("subset").join(kind.dir_name())
    }

    pub fn full_group_dir(&self, kind: GroupKind) -> PathBuf {
        self.root.join("full").join(kind.dir_name())
    }

    pub fn full_hour_dir(&self, hour: Hour) -> PathBuf {
        self.root.join("full").join("timeslots").join(hour.dir_name())
    }

    pub fn report_markdown_path(&self) -> PathBuf {
        self.root.join(REPORT_MARKDOWN_FILE)
    }

    pub fn report_json_path(&self) -> PathBuf {
        self.root.join(REPORT_JSON_FILE)
    }

    pub fn selection_csv_path(&self) -> PathBuf {
        self.root.join(SELECTION_CSV_FILE)
    }

    /// Create every directory the run will copy into. `hours` lists the
    /// hours present in the dataset, used for the by-hour full copy.
    pub fn create(&self, mode: FullCopyMode, hours: &[Hour]) -> Result<(), RunError> {
        let mut dirs = Vec::from(GroupKind::ALL.map(|kind| self.subset_dir(kind)));
        match mode {
            FullCopyMode::None => {}
            FullCopyMode::ByDayNight => {
                dirs.extend(GroupKind::ALL.map(|kind| self.full_group_dir(kind)));
            }
            FullCopyMode::ByHour => {
                dirs.extend(hours.iter().map(|hour| self.full_hour_dir(*hour)));
            }
        }

        for dir in dirs {
            fs::create_dir_all(&dir)
                .map_err(|error| RunError::io("failed to create output directory", dir, error))?;
        }
        Ok(())
    }
}
