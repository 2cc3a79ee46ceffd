//! Handles serialising and saving tables to disk in the _parquet_ file format.

pub mod summary;
pub mod table;

pub use summary::save_summary;
pub use table::save_table;
