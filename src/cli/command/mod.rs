pub mod list;
pub mod max_temp;

use std::path::PathBuf;

use anyhow::{anyhow, Result};

pub use list::list;
pub use max_temp::max_temp;

/// Output directory used when none is given.
pub fn default_output_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;

    Ok(home.join("isd-lite"))
}
