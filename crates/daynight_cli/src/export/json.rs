use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use daynight_core::DistributionReport;

use crate::error::RunError;

pub(crate) fn write_json_impl(
    report: &DistributionReport,
    mut writer: BufWriter<File>,
    path: &Path,
) -> Result<(), RunError> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer
        .flush()
        .map_err(|error| RunError::io("failed to write report", path, error))
}
