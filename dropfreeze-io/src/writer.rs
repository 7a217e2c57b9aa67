//! Writer for the fraction-frozen table.

use crate::Result;
use dropfreeze_core::{OutputRow, TableSink};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Output file written next to the working directory by default.
pub const DEFAULT_OUTPUT_FILE: &str = "fraction_frozen.csv";

/// Writes the fraction-frozen table as comma-delimited text.
///
/// One row per line, `temperature,fraction`, no header.
pub struct FractionFrozenWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl FractionFrozenWriter<File> {
    /// Creates (or truncates) the output file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> FractionFrozenWriter<W> {
    /// Wraps any byte sink.
    pub fn from_writer(inner: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        Self { writer }
    }

    /// Writes all rows and flushes.
    ///
    /// # Errors
    /// Returns an error if writing or flushing fails.
    pub fn write_rows(&mut self, rows: &[OutputRow]) -> Result<()> {
        for row in rows {
            self.writer.serialize((row.temperature, row.fraction))?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying sink.
    ///
    /// # Errors
    /// Returns an error if the final flush fails.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::Error::Io(e.into_error()))
    }
}

impl<W: Write> TableSink for FractionFrozenWriter<W> {
    type Error = crate::Error;

    fn write_table(&mut self, rows: &[OutputRow]) -> Result<()> {
        self.write_rows(rows)
    }
}

/// Sink that writes the table to a file in one step.
///
/// Rows are rendered in memory and the file is only touched once the whole
/// table is ready. A failed write removes whatever was created.
#[derive(Debug, Clone)]
pub struct TableFile {
    path: PathBuf,
}

impl TableFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSink for TableFile {
    type Error = crate::Error;

    fn write_table(&mut self, rows: &[OutputRow]) -> Result<()> {
        let mut staged = FractionFrozenWriter::from_writer(Vec::<u8>::new());
        staged.write_rows(rows)?;
        let bytes = staged.into_inner()?;

        if let Err(e) = std::fs::write(&self.path, bytes) {
            if self.path.is_file() {
                let _ = std::fs::remove_file(&self.path);
            }
            return Err(e.into());
        }
        log::debug!("wrote {} rows to {}", rows.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_rows() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = FractionFrozenWriter::create(file.path()).unwrap();

        writer
            .write_rows(&[OutputRow::new(-5.5, 0.25), OutputRow::new(-10.0, 1.0)])
            .unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["-5.5,0.25", "-10.0,1.0"]);
    }

    #[test]
    fn test_empty_table_writes_nothing() {
        let mut writer = FractionFrozenWriter::from_writer(Vec::<u8>::new());
        writer.write_table(&[]).unwrap();
        assert!(writer.into_inner().unwrap().is_empty());
    }

    #[test]
    fn test_table_file_writes_whole_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = TableFile::new(dir.path().join("out.csv"));

        sink.write_table(&[OutputRow::new(-7.25, 1.0)]).unwrap();

        let content = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(content, "-7.25,1.0\n");
    }

    #[test]
    fn test_table_file_missing_directory_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("out.csv");
        let mut sink = TableFile::new(&path);

        let result = sink.write_table(&[OutputRow::new(-7.25, 1.0)]);
        assert!(matches!(result, Err(crate::Error::Io(_))));
        assert!(!path.exists());
    }
}
