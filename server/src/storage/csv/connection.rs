use anyhow::{Context, Result};
use csv::{Reader, Writer};
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// CsvConnection manages the data directory and gives repositories
/// serde-backed access to one CSV file per table.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: Arc<Mutex<PathBuf>>,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
        }

        Ok(Self {
            base_directory: Arc::new(Mutex::new(base_path)),
        })
    }

    /// Create a connection in the default data directory, honoring the
    /// `FOODDIST_DATA_DIR` override.
    pub fn new_default() -> Result<Self> {
        let data_dir = match std::env::var("FOODDIST_DATA_DIR") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
            _ => PathBuf::from("data"),
        };

        info!("Using data directory: {}", data_dir.display());
        Self::new(data_dir)
    }

    /// Get the current base directory path
    pub fn base_directory(&self) -> PathBuf {
        let base_dir = self.base_directory.lock().unwrap();
        base_dir.clone()
    }

    /// Directory for generated report files, created on demand.
    pub fn exports_directory(&self) -> Result<PathBuf> {
        let dir = self.base_directory().join("exports");
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create exports directory {}", dir.display()))?;
        }
        Ok(dir)
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.base_directory().join(format!("{}.csv", table))
    }

    /// Read every row of a table. A missing file is an empty table.
    pub fn read_table<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        let file_path = self.table_path(table);

        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)
            .with_context(|| format!("Failed to open {}", file_path.display()))?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut rows = Vec::new();
        for result in csv_reader.deserialize() {
            let row: T =
                result.with_context(|| format!("Malformed record in {}", file_path.display()))?;
            rows.push(row);
        }

        Ok(rows)
    }

    /// Replace a table's contents. Writes to a temp file and renames so a
    /// crash mid-write never leaves a half-written table behind.
    pub fn write_table<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<()> {
        let file_path = self.table_path(table);
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to open {}", temp_path.display()))?;

            let writer = BufWriter::new(file);
            let mut csv_writer = Writer::from_writer(writer);

            for row in rows {
                csv_writer.serialize(row)?;
            }

            csv_writer.flush()?;
        }

        fs::rename(&temp_path, &file_path)
            .with_context(|| format!("Failed to replace {}", file_path.display()))?;

        Ok(())
    }

    /// Append a single row, rewriting the whole table. Row counts here are
    /// small enough that read-modify-write keeps the header handling in one
    /// place.
    pub fn append_row<T: Serialize + DeserializeOwned>(&self, table: &str, row: T) -> Result<()> {
        let mut rows: Vec<T> = self.read_table(table)?;
        rows.push(row);
        self.write_table(table, &rows)
    }
}
