use std::io;
use std::path::PathBuf;

use daynight_core::{ParseError, PartitionError};
use thiserror::Error;

/// Error type for configuration, classification and output failures.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("malformed image name: {0}")]
    Parse(#[from] ParseError),
    #[error("configuration error: {0}")]
    Partition(#[from] PartitionError),
    #[error("{context} '{}': {source}", path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to copy '{}' to '{}': {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write selection csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to build copy thread pool: {0}")]
    ThreadPool(String),
}

impl RunError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }

    /// Whether the run was rejected before any work started.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::Parse(_) | Self::Partition(_)
        )
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        if self.is_configuration() {
            2
        } else {
            1
        }
    }
}
