//! File name classification into hour buckets.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Delimiter separating the fields of an image file name.
pub const FIELD_DELIMITER: char = '-';
/// Zero-based index of the field whose first two characters hold the hour.
pub const HOUR_FIELD_INDEX: usize = 4;
/// Number of hour buckets in a day.
pub const HOURS_PER_DAY: u8 = 24;

/// Capture hour extracted from a file name, always in `[0, 23]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Hour(u8);

impl Hour {
    pub fn new(value: u8) -> Option<Self> {
        (value < HOURS_PER_DAY).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Zero-padded form used for per-hour output directories.
    pub fn dir_name(self) -> String {
        format!("{:02}", self.0)
    }

    /// All 24 hours in ascending order.
    pub fn all() -> impl Iterator<Item = Hour> {
        (0..HOURS_PER_DAY).map(Hour)
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Hour {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Hour::new(value).ok_or_else(|| format!("hour {value} is outside 0..=23"))
    }
}

impl From<Hour> for u8 {
    fn from(hour: Hour) -> Self {
        hour.0
    }
}

/// A file name that does not follow the `a-b-c-d-HH...` layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("'{file_name}' has {fields} '-' separated fields, expected at least 5")]
    MissingField { file_name: String, fields: usize },
    #[error("'{file_name}' does not start field 4 with a two-digit hour (found '{field}')")]
    InvalidHour { file_name: String, field: String },
    #[error("'{file_name}' encodes hour {hour}, expected 00-23")]
    HourOutOfRange { file_name: String, hour: u8 },
}

impl ParseError {
    pub fn file_name(&self) -> &str {
        match self {
            Self::MissingField { file_name, .. }
            | Self::InvalidHour { file_name, .. }
            | Self::HourOutOfRange { file_name, .. } => file_name,
        }
    }
}

/// Extract the capture hour from an image file name.
///
/// The name is split on `-`; the first two characters of field 4 must be
/// ASCII digits forming a value in `00..=23`.
pub fn classify_file_name(file_name: &str) -> Result<Hour, ParseError> {
    let fields: Vec<&str> = file_name.split(FIELD_DELIMITER).collect();
    let Some(field) = fields.get(HOUR_FIELD_INDEX) else {
        return Err(ParseError::MissingField {
            file_name: file_name.to_string(),
            fields: fields.len(),
        });
    };

    let digits = field
        .as_bytes()
        .get(..2)
        .filter(|bytes| bytes.iter().all(u8::is_ascii_digit));
    let Some(digits) = digits else {
        return Err(ParseError::InvalidHour {
            file_name: file_name.to_string(),
            field: field.to_string(),
        });
    };

    let hour = (digits[0] - b'0') * 10 + (digits[1] - b'0');
    Hour::new(hour).ok_or_else(|| ParseError::HourOutOfRange {
        file_name: file_name.to_string(),
        hour,
    })
}

/// What to do with a file name the classifier rejects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParsePolicy {
    /// Abort on the first malformed name.
    #[default]
    Strict,
    /// Log and drop malformed names; they count towards no total.
    SkipAndWarn,
}

/// Item names grouped by capture hour.
#[derive(Debug, Clone, Default)]
pub struct BucketIndex {
    buckets: BTreeMap<Hour, Vec<String>>,
    skipped: Vec<ParseError>,
}

impl BucketIndex {
    /// Classify every name. Names keep their input order inside a bucket and
    /// repeated names are indexed once.
    pub fn build<I>(names: I, policy: ParsePolicy) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut index = Self::default();
        let mut seen = HashSet::new();

        for name in names {
            if !seen.insert(name.clone()) {
                continue;
            }
            match classify_file_name(&name) {
                Ok(hour) => index.buckets.entry(hour).or_default().push(name),
                Err(error) => match policy {
                    ParsePolicy::Strict => return Err(error),
                    ParsePolicy::SkipAndWarn => {
                        warn!(file = error.file_name(), %error, "skipping malformed file name");
                        index.skipped.push(error);
                    }
                },
            }
        }

        Ok(index)
    }

    pub fn buckets(&self) -> &BTreeMap<Hour, Vec<String>> {
        &self.buckets
    }

    pub fn bucket(&self, hour: Hour) -> &[String] {
        self.buckets.get(&hour).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn available(&self, hour: Hour) -> usize {
        self.bucket(hour).len()
    }

    /// Total items across the given hours.
    pub fn available_in(&self, hours: &[Hour]) -> usize {
        hours.iter().map(|hour| self.available(*hour)).sum()
    }

    /// Total classified items.
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn skipped(&self) -> &[ParseError] {
        &self.skipped
    }
}
