use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use daynight_core::{render_markdown, DistributionReport};

use crate::error::RunError;

pub(crate) fn write_markdown_impl(
    report: &DistributionReport,
    mut writer: BufWriter<File>,
    path: &Path,
) -> Result<(), RunError> {
    let write = |writer: &mut BufWriter<File>| -> std::io::Result<()> {
        writer.write_all(render_markdown(report).as_bytes())?;
        writer.flush()
    };
    write(&mut writer).map_err(|error| RunError::io("failed to write report", path, error))
}
