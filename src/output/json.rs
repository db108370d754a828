//! JSON file sink
//!
//! Writes the batch as one UTF-8 JSON array, non-ASCII characters kept as-is.
//! The file is written beside its destination and renamed into place, so a
//! failed write never leaves a truncated file.

use crate::crawler::{ProductRecord, ResultBatch};
use crate::output::traits::{PersistenceError, PersistenceResult, Sink};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Sink writing a JSON array file
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for JsonFileSink {
    fn name(&self) -> &'static str {
        "json"
    }

    fn persist(&self, batch: &ResultBatch) -> PersistenceResult<()> {
        write_json(&self.path, batch.records())?;
        tracing::info!("Wrote {} records to {}", batch.len(), self.path.display());
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Writes records to `path` through a temporary sibling file
pub fn write_json(path: &Path, records: &[ProductRecord]) -> PersistenceResult<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let result = write_to(&tmp_path, records).and_then(|()| {
        fs::rename(&tmp_path, path).map_err(|e| io_error(path, e))
    });

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_to(path: &Path, records: &[ProductRecord]) -> PersistenceResult<()> {
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, records).map_err(|source| PersistenceError::Json {
        path: path.display().to_string(),
        source,
    })?;
    writer.flush().map_err(|e| io_error(path, e))?;
    Ok(())
}

/// Reads a JSON array previously written by [`JsonFileSink`]
///
/// Missing keys become empty strings; a missing `timeStamp` becomes the
/// load time.
pub fn load_json(path: &Path) -> PersistenceResult<Vec<ProductRecord>> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| PersistenceError::Json {
        path: path.display().to_string(),
        source,
    })
}
