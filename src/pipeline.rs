//! Runs station files through parse → reconcile → extract, one year at a time.
//!
//! Up to `concurrency` fetches are in flight while the current file is being
//! parsed, but results are always collected in listing order. A failure of any
//! kind only skips the file it belongs to.

use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use futures::{pin_mut, stream, StreamExt};
use indicatif::ProgressBar;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::{
    cli::create_progress_bar,
    error::{BatchError, FileError},
    extremum::{max_air_temp, Extremum, ExtremumResult},
    reading::{RawTable, StationFile},
    schema::reconcile,
    sink::Sink,
    source::FileSource,
};

#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Share of each year's listing to process, 1–100.
    pub percent: u32,
    /// Persist every reconciled station table, not just the summary.
    pub save_tables: bool,
    /// Fetches allowed in flight at once.
    pub concurrency: usize,
    /// Limit on each listing and each fetch.
    pub timeout: Duration,
    pub show_progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            percent: 100,
            save_tables: true,
            concurrency: 4,
            timeout: Duration::from_secs(60),
            show_progress: false,
        }
    }
}

#[derive(Debug)]
pub struct SkippedFile {
    pub file_name: String,
    pub error: FileError,
}

#[derive(Debug)]
pub struct YearReport {
    pub year: i32,
    pub listed: usize,
    /// One entry per successful file, in listing order.
    pub results: Vec<ExtremumResult>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug)]
pub struct BatchReport {
    pub years: Vec<YearReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.years.iter().map(|y| y.results.len()).sum()
    }

    pub fn skipped(&self) -> usize {
        self.years.iter().map(|y| y.skipped.len()).sum()
    }

    /// Skipped files tallied by error kind.
    pub fn skipped_by_kind(&self) -> BTreeMap<&'static str, usize> {
        let mut tally = BTreeMap::new();
        for s in self.years.iter().flat_map(|y| &y.skipped) {
            *tally.entry(s.error.kind()).or_insert(0) += 1;
        }

        tally
    }
}

/// Processes every year in `start..end` and writes one summary per listed year.
pub async fn run_batch<S: FileSource, K: Sink>(
    source: &S,
    sink: &K,
    start: i32,
    end: i32,
    config: &BatchConfig,
) -> Result<BatchReport, BatchError> {
    let mut years = Vec::new();

    for year in start..end {
        years.push(run_year(source, sink, year, config).await?);
    }

    if years.iter().all(|y| y.listed == 0) {
        return Err(BatchError::NoData { start, end });
    }

    Ok(BatchReport { years })
}

pub async fn run_year<S: FileSource, K: Sink>(
    source: &S,
    sink: &K,
    year: i32,
    config: &BatchConfig,
) -> Result<YearReport, BatchError> {
    let listing = match timeout(config.timeout, source.list(year)).await {
        Ok(listing) => listing,
        Err(_) => Err(timed_out(config.timeout)),
    };

    let files = match listing {
        Ok(names) => select_files(names, config.percent),
        Err(e) => {
            warn!(year, "could not list station files: {}", e);
            Vec::new()
        }
    };

    if files.is_empty() {
        return Ok(YearReport {
            year,
            listed: 0,
            results: Vec::new(),
            skipped: Vec::new(),
        });
    }

    info!(year, files = files.len(), "processing year");

    let progress = if config.show_progress {
        create_progress_bar(files.len() as u64, format!("{}", year))
    } else {
        ProgressBar::hidden()
    };

    let total = files.len();
    let fetches = stream::iter(files.iter().cloned())
        .map(move |name| async move {
            let started = Instant::now();
            let fetched = match timeout(config.timeout, source.fetch(year, &name)).await {
                Ok(fetched) => fetched,
                Err(_) => Err(timed_out(config.timeout)),
            };
            (name, started, fetched)
        })
        .buffered(config.concurrency.max(1));
    pin_mut!(fetches);

    let mut results = Vec::new();
    let mut skipped = Vec::new();
    let mut i = 0;

    while let Some((name, started, fetched)) = fetches.next().await {
        i += 1;
        progress.set_message(format!("processing {} of {}: {}", i, total, name));

        let station = StationFile::from_file_name(&name);
        let outcome = fetched
            .and_then(|bytes| process_file(&bytes, year, &station, sink, config.save_tables))
            .map(|extremum| extremum.into_result(station.identifier(), started.elapsed()));

        match outcome {
            Ok(result) => {
                debug!(
                    year,
                    file = %name,
                    station = ?station.station_id(),
                    max_temp = result.value,
                    at = %result.timestamp,
                    "extracted maximum"
                );
                results.push(result);
            }
            Err(error) => {
                warn!(year, file = %name, kind = error.kind(), "skipped file: {}", error);
                skipped.push(SkippedFile {
                    file_name: name,
                    error,
                });
            }
        }

        progress.inc(1);
    }

    progress.finish_with_message(format!(
        "{}: {} processed, {} skipped",
        year,
        results.len(),
        skipped.len()
    ));

    sink.persist_summary(&results, year)
        .map_err(|e| BatchError::Summary { year, source: e })?;

    Ok(YearReport {
        year,
        listed: total,
        results,
        skipped,
    })
}

/// Parses, reconciles and summarises one fetched station file.
pub fn process_file<K: Sink>(
    bytes: &[u8],
    year: i32,
    station: &StationFile,
    sink: &K,
    save_table: bool,
) -> Result<Extremum, FileError> {
    let raw = RawTable::from_bytes(bytes)?;
    if raw.skipped > 0 {
        debug!(
            file = station.identifier(),
            skipped = raw.skipped,
            "dropped malformed rows"
        );
    }

    let table = reconcile(&raw)?;
    debug!(
        file = station.identifier(),
        rows = table.num_rows(),
        columns = ?table.source_columns,
        "reconciled"
    );

    if save_table && !table.fields.is_empty() {
        sink.persist_table(&table, year, station.identifier())
            .map_err(FileError::Sink)?;
    }

    let extremum = max_air_temp(&table)?;
    if extremum.timestamp.to_naive().is_none() {
        warn!(
            file = station.identifier(),
            row = extremum.row,
            "maximum falls on an impossible date {}",
            extremum.timestamp
        );
    }

    Ok(extremum)
}

/// Keeps the first `max(1, floor(n * percent / 100))` names.
pub fn select_files(mut names: Vec<String>, percent: u32) -> Vec<String> {
    if names.is_empty() {
        return names;
    }

    let keep = (names.len() * percent.min(100) as usize / 100).max(1);
    names.truncate(keep);

    names
}

fn timed_out(limit: Duration) -> FileError {
    FileError::TransportFailure(format!("timed out after {:?}", limit))
}

// -- Tests -------------------------------------------------------------------
