//! Raw hourly records and the whitespace tokenizer.
//!
//! ISD-Lite files are nominally fixed width, but column widths drift between
//! years, so lines are split on runs of whitespace and every token is parsed
//! independently.

use std::{
    collections::HashMap,
    io::{BufRead, BufReader, Read},
};

use flate2::read::GzDecoder;
use tracing::debug;

use crate::error::FileError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// One record. `None` marks an absent or `NaN` cell; the `-9999` sentinel is
/// kept as a value and filtered where a field is read.
pub type RawRow = Vec<Option<f64>>;

#[derive(Debug, Clone, PartialEq)]
/// All well-formed records of one station file, every row `width` cells wide.
pub struct RawTable {
    pub width: usize,
    pub rows: Vec<RawRow>,
    pub skipped: usize,
}

impl RawTable {
    /// Builds a table from rows that already share one width.
    #[cfg(test)]
    pub fn from_rows(rows: Vec<RawRow>) -> Self {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);

        RawTable {
            width,
            rows,
            skipped: 0,
        }
    }

    /// Number of missing cells in each column.
    pub fn missing_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.width];
        for row in &self.rows {
            for (count, cell) in counts.iter_mut().zip(row) {
                if cell.is_none() {
                    *count += 1;
                }
            }
        }

        counts
    }

    /// Decompresses (if gzip) and tokenizes a station file.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FileError> {
        if bytes.starts_with(&GZIP_MAGIC) {
            Self::from_reader(GzDecoder::new(bytes))
        } else {
            Self::from_reader(bytes)
        }
    }

    fn from_reader<R: Read>(reader: R) -> Result<Self, FileError> {
        let mut lines = Vec::new();
        // Lines are decoded lossily so one bad byte only spoils its own row
        for line in BufReader::new(reader).split(b'\n') {
            let line = String::from_utf8_lossy(&line?).into_owned();
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }

        let width = match modal_width(&lines) {
            Some(w) => w,
            None => return Err(FileError::EmptySource),
        };

        let mut rows = Vec::with_capacity(lines.len());
        let mut skipped = 0;

        for line in &lines {
            match parse_line(line, width) {
                Some(row) => rows.push(row),
                None => skipped += 1,
            }
        }

        if rows.is_empty() {
            return Err(FileError::EmptySource);
        }

        debug!(rows = rows.len(), width, skipped, "parsed station file");

        Ok(RawTable {
            width,
            rows,
            skipped,
        })
    }
}

/// Most frequent token count; the count seen first wins a tie.
fn modal_width(lines: &[String]) -> Option<usize> {
    let mut tally: HashMap<usize, (usize, usize)> = HashMap::new();
    for (order, line) in lines.iter().enumerate() {
        let n = line.split_whitespace().count();
        tally.entry(n).or_insert((0, order)).0 += 1;
    }

    tally
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(width, _)| width)
}

/// Returns `None` for a malformed line: wrong token count or a non-numeric token.
fn parse_line(line: &str, width: usize) -> Option<RawRow> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != width {
        return None;
    }

    tokens.into_iter().map(parse_cell).collect()
}

/// `Some(None)` is a missing cell, `None` a token that cannot be a cell.
fn parse_cell(token: &str) -> Option<Option<f64>> {
    match token {
        "NaN" | "nan" | "NA" => return Some(None),
        _ => {}
    }

    match token.parse::<f64>() {
        Ok(v) if v.is_nan() => Some(None),
        Ok(v) if v.is_finite() => Some(Some(v)),
        _ => None,
    }
}

// -- Tests -------------------------------------------------------------------
