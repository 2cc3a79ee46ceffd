//! Maximum air temperature of a station-year.

use std::{fmt, time::Duration};

use chrono::{NaiveDate, NaiveDateTime};

use crate::{error::FileError, schema::ReconciledTable};

const TEMPERATURE_FIELD: &str = "AIR-TEMP";

/// ISD-Lite value for a missing observation.
const MISSING_SENTINEL: f64 = -9999.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Calendar components copied from a record. Not validated, so an
/// impossible date such as 31 April is carried through as-is.
pub struct Timestamp {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl Timestamp {
    /// The timestamp as a chrono value, if the components form a real date.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_opt(self.hour, 0, 0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:00",
            self.year, self.month, self.day, self.hour
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtremumResult {
    pub value: f64,
    pub timestamp: Timestamp,
    pub source: String,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Position and value of the maximum, before it is tagged with its source.
pub struct Extremum {
    pub row: usize,
    pub value: f64,
    pub timestamp: Timestamp,
}

impl Extremum {
    pub fn into_result(self, source: &str, duration: Duration) -> ExtremumResult {
        ExtremumResult {
            value: self.value,
            timestamp: self.timestamp,
            source: source.to_string(),
            duration,
        }
    }
}

/// Finds the first row holding the largest AIR-TEMP value, ignoring `-9999`.
///
/// Date components must be whole numbers in range for their type; anything
/// else is `NoValidExtremum`.
pub fn max_air_temp(table: &ReconciledTable) -> Result<Extremum, FileError> {
    let col = table
        .column_index(TEMPERATURE_FIELD)
        .ok_or(FileError::NoValidExtremum)?;

    let mut best: Option<(usize, f64)> = None;
    for (i, row) in table.rows.iter().enumerate() {
        if let Some(v) = row[col].filter(|&v| v != MISSING_SENTINEL) {
            if best.map_or(true, |(_, b)| v > b) {
                best = Some((i, v));
            }
        }
    }

    let (row, value) = best.ok_or(FileError::NoValidExtremum)?;
    let timestamp = timestamp_at(table, row).ok_or(FileError::NoValidExtremum)?;

    Ok(Extremum {
        row,
        value,
        timestamp,
    })
}

fn timestamp_at(table: &ReconciledTable, row: usize) -> Option<Timestamp> {
    Some(Timestamp {
        year: whole(table.value(row, "YEAR")?)?,
        month: whole(table.value(row, "MONTH")?)?,
        day: whole(table.value(row, "DAY")?)?,
        hour: whole(table.value(row, "HOUR")?)?,
    })
}

fn whole<T: TryFrom<i64>>(v: f64) -> Option<T> {
    if v.fract() != 0.0 {
        return None;
    }
    T::try_from(v as i64).ok()
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;
    use crate::schema::CANONICAL_FIELDS;

    fn table(rows: Vec<[Option<f64>; 5]>) -> ReconciledTable {
        ReconciledTable {
            fields: CANONICAL_FIELDS.to_vec(),
            source_columns: (0..12).collect(),
            rows: rows
                .into_iter()
                .map(|r| {
                    let mut row = r.to_vec();
                    row.extend([Some(0.0); 7]);
                    row
                })
                .collect(),
        }
    }

    fn at(year: f64, month: f64, day: f64, hour: f64, temp: Option<f64>) -> [Option<f64>; 5] {
        [Some(year), Some(month), Some(day), Some(hour), temp]
    }

    #[test]
    fn should_find_maximum_and_its_timestamp() {
        let t = table(vec![
            at(2017.0, 1.0, 1.0, 0.0, Some(-50.0)),
            at(2017.0, 1.0, 1.0, 1.0, Some(300.0)),
            at(2017.0, 1.0, 1.0, 2.0, None),
        ]);
        let e = max_air_temp(&t).unwrap();

        assert_eq!(e.value, 300.0);
        assert_eq!(e.row, 1);
        assert_eq!(e.timestamp.to_string(), "2017-01-01T01:00");
    }

    #[test]
    fn should_keep_first_of_equal_maxima() {
        let t = table(vec![
            at(2017.0, 6.0, 1.0, 12.0, Some(250.0)),
            at(2017.0, 7.0, 2.0, 13.0, Some(250.0)),
        ]);

        assert_eq!(max_air_temp(&t).unwrap().row, 0);
    }

    #[test]
    fn should_carry_impossible_dates() {
        let t = table(vec![at(2017.0, 4.0, 31.0, 23.0, Some(10.0))]);
        let e = max_air_temp(&t).unwrap();

        assert_eq!(e.timestamp.to_string(), "2017-04-31T23:00");
        assert_eq!(e.timestamp.to_naive(), None);
    }

    #[test]
    fn should_fail_on_all_missing_temperatures() {
        let t = table(vec![
            at(2017.0, 1.0, 1.0, 0.0, None),
            at(2017.0, 1.0, 1.0, 1.0, None),
        ]);

        assert!(matches!(max_air_temp(&t), Err(FileError::NoValidExtremum)));
    }

    #[test]
    fn should_ignore_sentinel_temperatures() {
        let t = table(vec![
            at(2017.0, 1.0, 1.0, 0.0, Some(-9999.0)),
            at(2017.0, 1.0, 1.0, 1.0, Some(-120.0)),
            at(2017.0, 1.0, 1.0, 2.0, Some(-9999.0)),
        ]);
        let e = max_air_temp(&t).unwrap();

        assert_eq!(e.value, -120.0);
        assert_eq!(e.row, 1);

        let all_sentinel = table(vec![at(2017.0, 1.0, 1.0, 0.0, Some(-9999.0))]);
        assert!(matches!(
            max_air_temp(&all_sentinel),
            Err(FileError::NoValidExtremum)
        ));
    }

    #[test]
    fn should_reject_fractional_or_negative_date_parts() {
        let fractional_hour = table(vec![at(2017.0, 1.0, 1.0, 1.5, Some(10.0))]);
        let negative_month = table(vec![at(2017.0, -1.0, 1.0, 0.0, Some(10.0))]);

        assert!(matches!(
            max_air_temp(&fractional_hour),
            Err(FileError::NoValidExtremum)
        ));
        assert!(matches!(
            max_air_temp(&negative_month),
            Err(FileError::NoValidExtremum)
        ));
    }

    #[test]
    fn should_fail_without_temperature_column() {
        let t = ReconciledTable {
            fields: CANONICAL_FIELDS[..4].to_vec(),
            source_columns: (0..4).collect(),
            rows: vec![vec![Some(2017.0), Some(1.0), Some(1.0), Some(0.0)]],
        };

        assert!(matches!(max_air_temp(&t), Err(FileError::NoValidExtremum)));
    }

    #[test]
    fn should_build_result() {
        let t = table(vec![at(2017.0, 8.0, 9.0, 10.0, Some(321.0))]);
        let r = max_air_temp(&t)
            .unwrap()
            .into_result("010010-99999-2017", Duration::from_millis(1500));

        assert_eq!(r.source, "010010-99999-2017");
        assert_eq!(r.duration.as_secs_f64(), 1.5);
        assert_eq!(
            r.timestamp.to_naive().unwrap().to_string(),
            "2017-08-09 10:00:00"
        );
    }
}
