//! Reduces a variable-width raw table to the canonical ISD-Lite fields.
//!
//! Some archive files carry stray columns (split tokens, trailing flags). Real
//! observation columns are recognised by having few missing cells: the columns
//! whose missing count is strictly below the 13th-smallest count are kept, in
//! their original order, and labelled with [`CANONICAL_FIELDS`].

use tracing::warn;

use crate::{
    error::FileError,
    reading::{RawRow, RawTable},
};

pub const CANONICAL_WIDTH: usize = 12;

pub const CANONICAL_FIELDS: [&str; CANONICAL_WIDTH] = [
    "YEAR",
    "MONTH",
    "DAY",
    "HOUR",
    "AIR-TEMP",
    "DEW-POINT-TEMP",
    "SEA-LEVEL-PRESSURE",
    "WIND-DIRECTION",
    "WIND-SPEED",
    "SKY-CONDITION",
    "RAIN-1HR",
    "RAIN-6HR",
];

#[derive(Debug, Clone, PartialEq)]
/// A raw table restricted to its selected columns, labelled left to right.
pub struct ReconciledTable {
    /// Canonical name of each selected column.
    pub fields: Vec<&'static str>,
    /// Position of each selected column in the raw table.
    pub source_columns: Vec<usize>,
    pub rows: Vec<RawRow>,
}

impl ReconciledTable {
    /// True when exactly the 12 canonical fields were selected.
    pub fn is_canonical(&self) -> bool {
        self.fields.len() == CANONICAL_WIDTH
    }

    pub fn column_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| *f == field)
    }

    pub fn value(&self, row: usize, field: &str) -> Option<f64> {
        let col = self.column_index(field)?;
        self.rows.get(row)?.get(col).copied().flatten()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

/// Selects and relabels the columns of `raw`.
///
/// Ties at the threshold are not broken: if the 12th and 13th smallest counts
/// are equal, every column with that count is dropped and fewer than 12 fields
/// come back. Check [`ReconciledTable::is_canonical`].
pub fn reconcile(raw: &RawTable) -> Result<ReconciledTable, FileError> {
    if raw.width < CANONICAL_WIDTH {
        return Err(FileError::SchemaUnderflow { columns: raw.width });
    }

    let counts = raw.missing_counts();
    let selected = select_columns(&counts);

    let rows = raw
        .rows
        .iter()
        .map(|row| selected.iter().map(|&i| row[i]).collect())
        .collect();

    let table = ReconciledTable {
        fields: CANONICAL_FIELDS[..selected.len()].to_vec(),
        source_columns: selected,
        rows,
    };

    if !table.is_canonical() {
        warn!(
            selected = table.fields.len(),
            columns = raw.width,
            ?counts,
            "missing-count tie at threshold, schema is not canonical"
        );
    }

    Ok(table)
}

/// Indices of the columns whose missing count is below the threshold.
fn select_columns(counts: &[usize]) -> Vec<usize> {
    let mut sorted = counts.to_vec();
    sorted.sort_unstable();

    match sorted.get(CANONICAL_WIDTH) {
        Some(&threshold) => counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c < threshold)
            .map(|(i, _)| i)
            .collect(),
        None => (0..counts.len()).collect(),
    }
}

// -- Tests -------------------------------------------------------------------
