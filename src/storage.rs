//! Resumable record storage.
//!
//! Records live in a single CSV file with one row per annotated image.
//! The header is the union of every record's columns in first-seen order,
//! so labels revealed only for some images still get a column; rows that
//! lack a column leave the cell empty.
//!
//! Every append rewrites the file (via a sibling temporary file and a
//! rename), so an interrupted session keeps every record completed so far.

use std::{
    collections::HashSet,
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
};

use crate::model::{Record, Value};

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// CSV-backed record store.
pub struct RecordStore {
    path: PathBuf,
    header: Vec<String>,
    records: Vec<Record>,
}

impl RecordStore {
    /// Opens the store at `path`, loading any existing records.
    ///
    /// A missing file is an empty store; nothing is written until the first append.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            tracing::info!(path = %path.display(), "record file not found, starting a new one");
            return Ok(Self {
                path,
                header: Vec::new(),
                records: Vec::new(),
            });
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let header: Vec<String> = reader.headers()?.iter().map(String::from).collect();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let mut record = Record::default();
            for (column, cell) in header.iter().zip(row.iter()) {
                if !cell.is_empty() {
                    record.insert(column, cell);
                }
            }
            records.push(record);
        }

        tracing::info!(
            path = %path.display(),
            records = records.len(),
            "resuming from existing records"
        );

        Ok(Self {
            path,
            header,
            records,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Values already recorded under `column`.
    ///
    /// Empty when the column doesn't exist yet.
    pub fn processed(&self, column: &str) -> HashSet<String> {
        self.records
            .iter()
            .filter_map(|r| r.get(column))
            .map(Value::to_string)
            .collect()
    }

    /// Adds a record and persists the whole store.
    pub fn append(&mut self, record: Record) -> Result<()> {
        for column in record.columns() {
            if !self.header.iter().any(|h| h == column) {
                self.header.push(column.to_string());
            }
        }
        self.records.push(record);
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let tmp = self.tmp_path();
        {
            let mut writer = csv::Writer::from_path(&tmp)?;
            writer.write_record(&self.header)?;
            for record in &self.records {
                writer.write_record(self.header.iter().map(|column| {
                    record.get(column).map(Value::to_string).unwrap_or_default()
                }))?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
