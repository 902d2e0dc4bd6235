//! Day/night split of the 24 hour buckets.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::{Hour, HOURS_PER_DAY};

/// First daytime hour unless configured otherwise.
pub const DEFAULT_DAY_START: u8 = 6;
/// First nighttime hour after the day window unless configured otherwise.
pub const DEFAULT_DAY_END: u8 = 18;

/// One of the two groups the hours are split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Day,
    Night,
}

impl GroupKind {
    pub const ALL: [GroupKind; 2] = [GroupKind::Day, GroupKind::Night];

    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "Daytime",
            Self::Night => "Nighttime",
        }
    }

    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Day => "daytime",
            Self::Night => "nighttime",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid day window {day_start}..{day_end}: expected day_start < day_end <= 24")]
pub struct PartitionError {
    pub day_start: u8,
    pub day_end: u8,
}

/// Daytime is the half-open hour window `[day_start, day_end)`; every other
/// hour is nighttime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayNightPartition {
    pub day_start: u8,
    pub day_end: u8,
}

impl Default for DayNightPartition {
    fn default() -> Self {
        Self {
            day_start: DEFAULT_DAY_START,
            day_end: DEFAULT_DAY_END,
        }
    }
}

impl DayNightPartition {
    pub fn new(day_start: u8, day_end: u8) -> Result<Self, PartitionError> {
        let partition = Self { day_start, day_end };
        partition.validate()?;
        Ok(partition)
    }

    pub fn validate(&self) -> Result<(), PartitionError> {
        if self.day_start < self.day_end && self.day_end <= HOURS_PER_DAY {
            Ok(())
        } else {
            Err(PartitionError {
                day_start: self.day_start,
                day_end: self.day_end,
            })
        }
    }

    pub fn group_of(&self, hour: Hour) -> GroupKind {
        if (self.day_start..self.day_end).contains(&hour.value()) {
            GroupKind::Day
        } else {
            GroupKind::Night
        }
    }

    /// Hours belonging to `kind`, ascending.
    pub fn hours(&self, kind: GroupKind) -> Vec<Hour> {
        Hour::all()
            .filter(|hour| self.group_of(*hour) == kind)
            .collect()
    }
}
