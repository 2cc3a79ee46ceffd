//! Where reconciled tables and yearly summaries are written.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{error::SinkError, extremum::ExtremumResult, parquet, schema::ReconciledTable};

pub const SUMMARY_NAME: &str = "annual_max_temp_by_station";

/// Persists tables grouped by year.
pub trait Sink {
    fn persist_table(
        &self,
        table: &ReconciledTable,
        year: i32,
        identifier: &str,
    ) -> Result<(), SinkError>;

    fn persist_summary(&self, results: &[ExtremumResult], year: i32) -> Result<(), SinkError>;
}

/// Writes `<root>/<year>/<identifier>.parquet`.
pub struct ParquetSink {
    root: PathBuf,
}

impl ParquetSink {
    pub fn new(root: &Path) -> Self {
        ParquetSink {
            root: root.to_path_buf(),
        }
    }

    fn year_path(&self, year: i32, identifier: &str) -> Result<PathBuf, SinkError> {
        let dir = self.root.join(year.to_string());
        fs::create_dir_all(&dir)?;

        Ok(dir.join(format!("{}.parquet", identifier)))
    }
}

impl Sink for ParquetSink {
    fn persist_table(
        &self,
        table: &ReconciledTable,
        year: i32,
        identifier: &str,
    ) -> Result<(), SinkError> {
        parquet::save_table(table, &self.year_path(year, identifier)?)
    }

    fn persist_summary(&self, results: &[ExtremumResult], year: i32) -> Result<(), SinkError> {
        parquet::save_summary(results, &self.year_path(year, SUMMARY_NAME)?)
    }
}

// -- Tests -------------------------------------------------------------------
