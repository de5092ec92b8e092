use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tracing::{debug, info};

use crate::error::Result;
use crate::pipeline::processing::clean::CleanedRecord;
use crate::types::Column;

/// Writes the final dataset as one CSV file
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write every record, replacing any previous file. Returns the row count.
    pub fn write(&self, records: &[CleanedRecord]) -> Result<usize> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        let rows = write_records(file, records)?;
        info!("💾 Wrote {} rows to {}", rows, self.path.display());
        Ok(rows)
    }
}

/// Header row first, then one row per record. Empty datasets still get the header.
pub fn write_records<W: io::Write>(out: W, records: &[CleanedRecord]) -> Result<usize> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(Column::OUTPUT.iter().map(|c| c.header()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    debug!("CSV flushed with {} records", records.len());
    Ok(records.len())
}
