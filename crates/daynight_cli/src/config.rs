//! Run configuration: built-in defaults, an optional JSON file, and
//! command-line overrides, in increasing order of precedence.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use daynight_core::{DayNightPartition, ParsePolicy};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::error::RunError;

pub const DEFAULT_SOURCE_DIR: &str = "dataset";
pub const DEFAULT_SAMPLE_COUNT_DAY: usize = 50;
pub const DEFAULT_SAMPLE_COUNT_NIGHT: usize = 50;

/// How the complete dataset is mirrored under `full/`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FullCopyMode {
    /// No full copy.
    None,
    /// One directory per capture hour.
    ByHour,
    /// One directory per day/night group.
    #[default]
    #[value(name = "by-daynight", alias = "by-day-night")]
    #[serde(rename = "by-daynight", alias = "by-day-night")]
    ByDayNight,
}

impl FullCopyMode {
    /// Grouping description used in reports; `None` when nothing is copied.
    pub fn grouping_label(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::ByHour => Some("hourly timeslots"),
            Self::ByDayNight => Some("daytime/nighttime"),
        }
    }
}

/// Immutable settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub source_dir: PathBuf,
    /// Parent of the `classified_<timestamp>` output root.
    pub output_dir: PathBuf,
    pub sample_count_day: usize,
    pub sample_count_night: usize,
    pub full_copy_mode: FullCopyMode,
    pub partition: DayNightPartition,
    /// Fixed seed for the sampler; entropy-seeded when absent.
    pub seed: Option<u64>,
    pub parse_policy: ParsePolicy,
    /// Extensions (without the dot, case-insensitive) treated as images.
    pub image_extensions: Vec<String>,
    /// Worker threads for the copy phase; rayon's default when absent.
    pub copy_threads: Option<usize>,
    pub show_progress: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            output_dir: PathBuf::from("."),
            sample_count_day: DEFAULT_SAMPLE_COUNT_DAY,
            sample_count_night: DEFAULT_SAMPLE_COUNT_NIGHT,
            full_copy_mode: FullCopyMode::default(),
            partition: DayNightPartition::default(),
            seed: None,
            parse_policy: ParsePolicy::default(),
            image_extensions: vec!["jpg".to_string(), "png".to_string()],
            copy_threads: None,
            show_progress: true,
        }
    }
}

impl RunConfig {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_sample_counts(mut self, day: usize, night: usize) -> Self {
        self.sample_count_day = day;
        self.sample_count_night = night;
        self
    }

    pub fn with_full_copy_mode(mut self, mode: FullCopyMode) -> Self {
        self.full_copy_mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parse_policy(mut self, policy: ParsePolicy) -> Self {
        self.parse_policy = policy;
        self
    }

    pub fn with_partition(mut self, partition: DayNightPartition) -> Self {
        self.partition = partition;
        self
    }

    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Load settings from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, RunError> {
        let contents = fs::read_to_string(path)
            .map_err(|error| RunError::io("failed to read config file", path, error))?;
        serde_json::from_str(&contents).map_err(|error| {
            RunError::Configuration(format!("invalid config file '{}': {error}", path.display()))
        })
    }

    /// Reject settings the run cannot start with.
    pub fn validate(&self) -> Result<(), RunError> {
        let source = self.source_dir.display();
        if !self.source_dir.exists() {
            return Err(RunError::Configuration(format!(
                "source directory '{source}' does not exist; pass a valid path with --source"
            )));
        }
        if !self.source_dir.is_dir() {
            let message = format!("source '{source}' is not a directory");
            return Err(RunError::Configuration(message));
        }
        self.partition.validate()?;
        if self.image_extensions.is_empty() {
            return Err(RunError::Configuration("image_extensions cannot be empty".to_string()));
        }
        if let Some(0) = self.copy_threads {
            return Err(RunError::Configuration(
                "copy_threads must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "daynight",
    about = "Split a timestamp-named image dataset into day/night subsets",
    long_about = "Classifies images by the capture hour in their file names, samples a\n\
                  bounded, fair subset for daytime and nighttime, copies it (and optionally\n\
                  the full dataset) into a timestamped output tree and writes a report."
)]
pub struct Cli {
    /// Directory holding the images to classify
    #[arg(long, env = "DAYNIGHT_SOURCE")]
    pub source: Option<PathBuf>,
    /// Parent directory for the classified_<timestamp> output tree
    #[arg(long, env = "DAYNIGHT_OUTPUT")]
    pub output: Option<PathBuf>,
    /// JSON file with run settings; flags given here take precedence
    #[arg(long, env = "DAYNIGHT_CONFIG")]
    pub config: Option<PathBuf>,
    /// Number of daytime images to sample
    #[arg(long)]
    pub day_count: Option<usize>,
    /// Number of nighttime images to sample
    #[arg(long)]
    pub night_count: Option<usize>,
    /// How to mirror the full dataset under full/
    #[arg(long, value_enum)]
    pub full_copy: Option<FullCopyMode>,
    /// First daytime hour (inclusive)
    #[arg(long)]
    pub day_start: Option<u8>,
    /// First nighttime hour after the day window (exclusive end of day)
    #[arg(long)]
    pub day_end: Option<u8>,
    /// Seed for reproducible sampling
    #[arg(long, env = "DAYNIGHT_SEED")]
    pub seed: Option<u64>,
    /// Skip file names without a readable hour instead of aborting
    #[arg(long)]
    pub skip_malformed: bool,
    /// Worker threads for copying
    #[arg(long)]
    pub threads: Option<usize>,
    /// Hide progress bars
    #[arg(long)]
    pub no_progress: bool,
    /// Log verbosity (off, error, warn, info, debug, trace)
    #[arg(long, env = "DAYNIGHT_LOG", default_value = "info")]
    pub log_level: LevelFilter,
}

impl Cli {
    /// Merge the optional config file and the flags into a [`RunConfig`].
    pub fn resolve(&self) -> Result<RunConfig, RunError> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(source) = &self.source {
            config.source_dir = source.clone();
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(count) = self.day_count {
            config.sample_count_day = count;
        }
        if let Some(count) = self.night_count {
            config.sample_count_night = count;
        }
        if let Some(mode) = self.full_copy {
            config.full_copy_mode = mode;
        }
        if let Some(start) = self.day_start {
            config.partition.day_start = start;
        }
        if let Some(end) = self.day_end {
            config.partition.day_end = end;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.skip_malformed {
            config.parse_policy = ParsePolicy::SkipAndWarn;
        }
        if self.threads.is_some() {
            config.copy_threads = self.threads;
        }
        if self.no_progress {
            config.show_progress = false;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn defaults_match_historical_settings() {
        let config = RunConfig::default();
        assert_eq!(config.source_dir, PathBuf::from("dataset"));
        assert_eq!(config.sample_count_day, 50);
        assert_eq!(config.sample_count_night, 50);
        assert_eq!(config.full_copy_mode, FullCopyMode::ByDayNight);
        assert_eq!(config.partition, DayNightPartition::default());
        assert_eq!(config.parse_policy, ParsePolicy::Strict);
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        let json = r#"{
            "sample_count_day": 10,
            "sample_count_night": 20,
            "full_copy_mode": "by-hour",
            "seed": 5
        }"#;
        file.write_all(json.as_bytes()).unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = Cli::parse_from([
            "daynight",
            "--config",
            path.as_str(),
            "--night-count",
            "7",
            "--day-end",
            "20",
            "--skip-malformed",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.sample_count_day, 10);
        assert_eq!(config.sample_count_night, 7);
        assert_eq!(config.full_copy_mode, FullCopyMode::ByHour);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.partition, DayNightPartition::new(6, 20).unwrap());
        assert_eq!(config.parse_policy, ParsePolicy::SkipAndWarn);
        assert_eq!(cli.log_level, LevelFilter::INFO);
    }

    #[test]
    fn full_copy_mode_accepts_both_spellings() {
        let cli = Cli::parse_from(["daynight", "--full-copy", "by-day-night"]);
        assert_eq!(cli.full_copy, Some(FullCopyMode::ByDayNight));
        let cli = Cli::parse_from(["daynight", "--full-copy", "none"]);
        assert_eq!(cli.full_copy, Some(FullCopyMode::None));

        let mode: FullCopyMode = serde_json::from_str("\"by-daynight\"").unwrap();
        assert_eq!(mode, FullCopyMode::ByDayNight);
    }

    #[test]
    fn invalid_config_file_is_a_configuration_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let error = RunConfig::from_json_file(file.path()).expect_err("should fail");
        assert!(error.is_configuration());
    }

    #[test]
    fn validate_rejects_missing_source_and_bad_settings() {
        let missing = RunConfig::new("/definitely/not/here");
        assert!(matches!(missing.validate(), Err(RunError::Configuration(_))));

        let dir = tempfile::tempdir().unwrap();
        let window = DayNightPartition {
            day_start: 20,
            day_end: 4,
        };
        let bad_window = RunConfig::new(dir.path()).with_partition(window);
        assert!(matches!(bad_window.validate(), Err(RunError::Partition(_))));

        let mut zero_threads = RunConfig::new(dir.path());
        zero_threads.copy_threads = Some(0);
        assert!(zero_threads.validate().is_err());

        assert!(RunConfig::new(dir.path()).validate().is_ok());
    }
}
