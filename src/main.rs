mod cli;
mod error;
mod extremum;
mod parquet;
mod pipeline;
mod reading;
mod schema;
mod sink;
mod source;

use std::time::Duration;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{command, Cli, Commands};
use pipeline::BatchConfig;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::MaxTemp {
            start_year,
            end_year,
            percent,
            output,
            no_tables,
            concurrency,
            timeout,
            archive,
        } => {
            let config = BatchConfig {
                percent,
                save_tables: !no_tables,
                concurrency,
                timeout: Duration::from_secs(timeout),
                show_progress: true,
            };

            match command::max_temp(start_year, end_year, output, config, &archive).await {
                Ok(dir) => println!("Tables saved to `{}`", dir),
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        Commands::List { year, archive } => match command::list(year, &archive).await {
            Ok(lines) => {
                for line in lines {
                    println!("{}", line);
                }
            }
            Err(e) => eprintln!("Error: {}", e),
        },
    }

    Ok(())
}
