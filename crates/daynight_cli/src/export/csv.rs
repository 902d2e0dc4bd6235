use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::SelectionRow;
use crate::error::RunError;

pub(crate) fn write_selection_impl(
    rows: &[SelectionRow],
    writer: BufWriter<File>,
    path: &Path,
) -> Result<(), RunError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()
        .map_err(|error| RunError::io("failed to write selection", path, error))
}
