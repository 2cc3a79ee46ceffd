//! Fetches station files from the NCEI ISD-Lite archive over HTTPS.

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::FileSource;
use crate::error::FileError;

pub const DEFAULT_BASE_URL: &str = "https://www.ncei.noaa.gov/pub/data/noaa/isd-lite";

pub struct HttpSource {
    client: Client,
    base_url: Url,
    selector: Selector,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self, FileError> {
        let base_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .map_err(|e| FileError::TransportFailure(format!("bad base url {}: {}", base_url, e)))?;
        let selector = Selector::parse(r#"a[href$=".gz"]"#)
            .map_err(|e| FileError::TransportFailure(format!("bad link selector: {:?}", e)))?;

        Ok(HttpSource {
            client: Client::new(),
            base_url,
            selector,
        })
    }

    fn year_url(&self, year: i32) -> Result<Url, FileError> {
        self.base_url
            .join(&format!("{}/", year))
            .map_err(|e| FileError::TransportFailure(e.to_string()))
    }

    fn file_url(&self, year: i32, file_name: &str) -> Result<Url, FileError> {
        self.year_url(year)?
            .join(file_name)
            .map_err(|e| FileError::TransportFailure(e.to_string()))
    }

    /// Names of the `*.gz` files an index page links to inside `dir`,
    /// deduplicated in page order. Links are resolved against `dir`, so
    /// relative, absolute and single-quoted hrefs are all accepted.
    fn parse_listing(&self, dir: &Url, html: &str) -> Vec<String> {
        let links = Html::parse_document(html)
            .select(&self.selector)
            .filter_map(|e| e.value().attr("href"))
            .filter_map(|href| dir.join(href).ok())
            .filter_map(|link| file_name_in(dir, &link))
            .collect::<Vec<_>>();

        let mut names: Vec<String> = Vec::new();
        for name in links {
            if !names.contains(&name) {
                names.push(name);
            }
        }

        names
    }

    async fn get(&self, url: &Url) -> Result<reqwest::Response, FileError> {
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(FileError::TransportFailure(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        Ok(response)
    }
}

/// Last path segment of `link`, if `link` is a file directly inside `dir`.
fn file_name_in(dir: &Url, link: &Url) -> Option<String> {
    let name = link.path_segments()?.last()?.to_string();
    if name.is_empty() || dir.join(&name).ok()? != *link {
        return None;
    }

    Some(name)
}

impl FileSource for HttpSource {
    async fn list(&self, year: i32) -> Result<Vec<String>, FileError> {
        let url = self.year_url(year)?;
        let html = self.get(&url).await?.text().await?;
        let names = self.parse_listing(&url, &html);
        debug!(year, files = names.len(), "listed {}", url);

        Ok(names)
    }

    async fn fetch(&self, year: i32, file_name: &str) -> Result<Vec<u8>, FileError> {
        let url = self.file_url(year, file_name)?;
        let bytes = self.get(&url).await?.bytes().await?;

        Ok(bytes.to_vec())
    }
}

// -- Tests -------------------------------------------------------------------
