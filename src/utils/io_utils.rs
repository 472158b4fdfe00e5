use super::{readers::is_gzipped, Result};
use flate2::{write::GzEncoder, Compression};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Opens `path` for writing, gzip-compressing when it ends in `.gz`.
pub fn create_text_writer(path: &Path) -> Result<Box<dyn Write + Send>> {
    let file =
        File::create(path).map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
    if is_gzipped(path) {
        Ok(Box::new(BufWriter::new(GzEncoder::new(
            file,
            Compression::default(),
        ))))
    } else {
        Ok(Box::new(BufWriter::new(file)))
    }
}
