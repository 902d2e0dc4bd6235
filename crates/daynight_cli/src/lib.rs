//! Command-line shell around `daynight_core`.
//!
//! Reads a flat directory of timestamp-named images, samples a day and a
//! night subset, and writes them with a report into a timestamped output tree.
//!
//! # Quick Start
//!
//! ```no_run
//! use chrono::Local;
//! use daynight_cli::{run, FullCopyMode, RunConfig};
//!
//! let config = RunConfig::new("nuImages/samples/CAM_FRONT")
//!     .with_sample_counts(50, 50)
//!     .with_full_copy_mode(FullCopyMode::None)
//!     .with_seed(7);
//! let outcome = run(&config, Local::now()).unwrap();
//! println!("{}", outcome.output_root.display());
//! ```
//!
//! # Architecture
//!
//! - [`config`]: run settings from defaults, JSON file and flags
//! - [`scan`]: source directory listing
//! - [`pipeline`]: planning (all fatal checks, no writes) and execution
//! - [`layout`]: output tree paths
//! - [`copy`]: parallel copy phase with progress bars
//! - [`export`]: report.md, report.json and selection.csv writers
//! - [`logging`]: tracing subscriber setup

pub mod config;
pub mod copy;
pub mod error;
pub mod export;
pub mod layout;
pub mod logging;
pub mod pipeline;
pub mod scan;

pub use config::{Cli, FullCopyMode, RunConfig};
pub use error::RunError;
pub use pipeline::{execute_plan, plan_run, run, RunOutcome, RunPlan};
