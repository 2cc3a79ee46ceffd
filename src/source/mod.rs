//! Where station files come from.

pub mod http;
pub mod local;

pub use http::HttpSource;
pub use local::LocalSource;

use crate::error::FileError;

/// A remote or local archive of station-year files grouped by year.
#[allow(async_fn_in_trait)]
pub trait FileSource {
    /// File names available for `year`, in archive order.
    async fn list(&self, year: i32) -> Result<Vec<String>, FileError>;

    /// The (still compressed) contents of one station file.
    async fn fetch(&self, year: i32, file_name: &str) -> Result<Vec<u8>, FileError>;
}
