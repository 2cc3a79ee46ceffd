use std::{fs, path::PathBuf};

use anyhow::{anyhow, Result};
use tracing::info;

use crate::{
    cli::ArchiveArgs,
    pipeline::{run_batch, BatchConfig, BatchReport},
    sink::ParquetSink,
    source::{FileSource, HttpSource, LocalSource},
};

use super::default_output_dir;

/// Runs the batch over `[start_year, end_year)` and returns the output directory.
pub async fn max_temp(
    start_year: i32,
    end_year: Option<i32>,
    output: Option<PathBuf>,
    config: BatchConfig,
    archive: &ArchiveArgs,
) -> Result<String> {
    let end_year = end_year.unwrap_or(start_year + 1);
    if end_year <= start_year {
        return Err(anyhow!(
            "End year {} must be after start year {}",
            end_year,
            start_year
        ));
    }

    let output = match output {
        Some(dir) => dir,
        None => default_output_dir()?,
    };
    fs::create_dir_all(&output)?;
    let sink = ParquetSink::new(&output);

    let report = match &archive.local {
        Some(dir) => run(&LocalSource::new(dir), &sink, start_year, end_year, &config).await?,
        None => {
            let source = HttpSource::new(&archive.base_url)?;
            run(&source, &sink, start_year, end_year, &config).await?
        }
    };

    info!(
        succeeded = report.succeeded(),
        skipped = report.skipped(),
        by_kind = ?report.skipped_by_kind(),
        "batch complete"
    );

    Ok(output.to_string_lossy().to_string())
}

async fn run<S: FileSource>(
    source: &S,
    sink: &ParquetSink,
    start_year: i32,
    end_year: i32,
    config: &BatchConfig,
) -> Result<BatchReport> {
    let report = run_batch(source, sink, start_year, end_year, config).await?;

    for year in &report.years {
        println!(
            "{}: {} of {} station files summarised",
            year.year,
            year.results.len(),
            year.listed
        );
    }

    Ok(report)
}

// -- Tests -------------------------------------------------------------------
