use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::RunError;

pub(crate) fn create_output_file(path: &Path) -> Result<BufWriter<File>, RunError> {
    let file = File::create(path)
        .map_err(|error| RunError::io("failed to create output file", path, error))?;
    Ok(BufWriter::new(file))
}
