//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use clap::{command, Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::source::http::DEFAULT_BASE_URL;

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the hottest hour of each station-year
    MaxTemp {
        /// First year to process
        #[arg(long)]
        start_year: i32,
        /// Year to stop before; defaults to the year after start
        #[arg(long)]
        end_year: Option<i32>,
        /// Percentage of each year's station files to process
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=100))]
        percent: u32,
        /// Output directory; defaults to ~/isd-lite
        #[arg(long)]
        output: Option<PathBuf>,
        /// Only write the yearly summaries, not every station table
        #[arg(long)]
        no_tables: bool,
        /// Downloads in flight at once
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
        /// Per-file timeout in seconds
        #[arg(long, default_value_t = 60)]
        timeout: u64,
        #[command(flatten)]
        archive: ArchiveArgs,
    },
    /// List the station files for a year
    List {
        #[arg(long)]
        year: i32,
        #[command(flatten)]
        archive: ArchiveArgs,
    },
}

#[derive(Args)]
/// Where station files are read from
pub struct ArchiveArgs {
    /// Archive root URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
    /// Read `<DIR>/<year>/*.gz` from disk instead of the archive
    #[arg(long, value_name = "DIR")]
    pub local: Option<PathBuf>,
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    ProgressBar::new(size).with_message(message).with_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    )
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn should_verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn should_parse_max_temp_defaults() {
        let cli = Cli::parse_from(["isdlite", "max-temp", "--start-year", "2017"]);

        match cli.command {
            Commands::MaxTemp {
                start_year,
                end_year,
                percent,
                no_tables,
                timeout,
                archive,
                ..
            } => {
                assert_eq!(start_year, 2017);
                assert_eq!(end_year, None);
                assert_eq!(percent, 100);
                assert!(!no_tables);
                assert_eq!(timeout, 60);
                assert_eq!(archive.base_url, DEFAULT_BASE_URL);
                assert!(archive.local.is_none());
            }
            _ => panic!("expected max-temp"),
        }
    }

    #[test]
    fn should_reject_out_of_range_percent() {
        let result = Cli::try_parse_from([
            "isdlite",
            "max-temp",
            "--start-year",
            "2017",
            "--percent",
            "0",
        ]);

        assert!(result.is_err());
    }
}
