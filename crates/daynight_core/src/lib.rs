//! Hour-bucketed sampling for timestamp-named image datasets.
//!
//! Image file names carry the capture hour as the first two digits of their
//! fifth dash-delimited field. This crate classifies names into hour buckets,
//! splits the 24 buckets into a day and a night group, and draws a bounded,
//! fair sample from each group.
//!
//! # Quick Start
//!
//! ```
//! use daynight_core::{
//!     distribute, rng_from_seed, BucketIndex, DayNightPartition, GroupKind, ParsePolicy,
//! };
//!
//! let names = vec![
//!     "n015-2018-07-18-11-07-57+0800__CAM_FRONT__1531883530412470.jpg".to_string(),
//!     "n015-2018-07-18-22-41-03+0800__CAM_FRONT__1531925063412460.jpg".to_string(),
//! ];
//! let index = BucketIndex::build(names, ParsePolicy::Strict).unwrap();
//! let partition = DayNightPartition::default();
//! let day_hours = partition.hours(GroupKind::Day);
//!
//! let mut rng = rng_from_seed(Some(7));
//! let day = distribute(&day_hours, index.buckets(), 10, &mut rng);
//! assert_eq!(day.selected.len(), 1);
//! ```
//!
//! # Architecture
//!
//! - [`classify`]: file name → [`Hour`] and the [`BucketIndex`] built from a listing
//! - [`partition`]: configurable day/night split of the 24 hour buckets
//! - [`distribute`]: the fairness-first bucketed sampler
//! - [`report`]: typed distribution report and its text renderings
//!
//! Nothing here touches the filesystem; the `daynight_cli` crate owns I/O.

pub mod classify;
pub mod distribute;
pub mod partition;
pub mod report;

pub use classify::{classify_file_name, BucketIndex, Hour, ParseError, ParsePolicy};
pub use distribute::{distribute, rng_from_seed, Distribution};
pub use partition::{DayNightPartition, GroupKind, PartitionError};
pub use report::{
    config_fingerprint, render_console, render_markdown, BucketReport, DistributionReport,
    GroupReport,
};
