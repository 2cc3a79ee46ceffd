pub mod raw;
pub mod station;

pub use raw::{RawRow, RawTable};
pub use station::StationFile;
