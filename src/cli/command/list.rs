//! List the station files available for one year.

use anyhow::Result;

use crate::{
    cli::{create_spinner, ArchiveArgs},
    reading::StationFile,
    source::{FileSource, HttpSource, LocalSource},
};

pub async fn list(year: i32, archive: &ArchiveArgs) -> Result<Vec<String>> {
    let bar = create_spinner(format!("Listing station files for {}...", year));

    let names = match &archive.local {
        Some(dir) => LocalSource::new(dir).list(year).await?,
        None => HttpSource::new(&archive.base_url)?.list(year).await?,
    };

    bar.finish_with_message(format!("{} station files listed", names.len()));

    Ok(names
        .iter()
        .map(|name| describe(&StationFile::from_file_name(name)))
        .collect())
}

fn describe(file: &StationFile) -> String {
    match (file.station_id(), file.year) {
        (Some(id), Some(year)) => format!("{}  station {} year {}", file.identifier(), id, year),
        _ => file.identifier().to_string(),
    }
}

// -- Tests -------------------------------------------------------------------
