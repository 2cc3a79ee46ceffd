//! Save the per-year maximum temperature summary to a parquet file.

use std::{fs::File, path::Path, sync::Arc};

use arrow::{
    array::{ArrayRef, Float64Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::{arrow::ArrowWriter, file::properties::WriterProperties};

use crate::{error::SinkError, extremum::ExtremumResult};

pub fn save_summary(results: &[ExtremumResult], file_path: &Path) -> Result<(), SinkError> {
    let file = File::create(file_path)?;

    // Timestamps are stored as text since the components are not calendar-checked
    let schema = Arc::new(Schema::new(vec![
        Field::new("timestamp", DataType::Utf8, false),
        Field::new("source", DataType::Utf8, false),
        Field::new("process_time", DataType::Float64, false),
        Field::new("max_temp", DataType::Float64, false),
    ]));

    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

    let num_rows = results.len();

    let mut timestamps = Vec::with_capacity(num_rows);
    let mut sources = Vec::with_capacity(num_rows);
    let mut process_times = Vec::with_capacity(num_rows);
    let mut max_temps = Vec::with_capacity(num_rows);

    for r in results {
        timestamps.push(r.timestamp.to_string());
        sources.push(r.source.clone());
        process_times.push(r.duration.as_secs_f64());
        max_temps.push(r.value);
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(timestamps)),
        Arc::new(StringArray::from(sources)),
        Arc::new(Float64Array::from(process_times)),
        Arc::new(Float64Array::from(max_temps)),
    ];

    let batch = RecordBatch::try_new(schema, columns)?;

    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use std::{fs, time::Duration};

    use arrow::array::{Array, Float64Array, StringArray};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::extremum::Timestamp;

    fn results_fixture() -> Vec<ExtremumResult> {
        vec![
            ExtremumResult {
                value: 300.0,
                timestamp: Timestamp {
                    year: 2017,
                    month: 1,
                    day: 1,
                    hour: 1,
                },
                source: "010010-99999-2017".to_string(),
                duration: Duration::from_millis(250),
            },
            ExtremumResult {
                value: 412.0,
                timestamp: Timestamp {
                    year: 2017,
                    month: 7,
                    day: 14,
                    hour: 15,
                },
                source: "722950-23174-2017".to_string(),
                duration: Duration::from_secs(2),
            },
        ]
    }

    #[test]
    fn should_write_summary_columns() {
        let temp_file = NamedTempFile::new().unwrap();
        save_summary(&results_fixture(), temp_file.path()).unwrap();

        let file = fs::File::open(temp_file.path()).unwrap();
        let mut reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();
        let batch = reader.next().unwrap().unwrap();

        assert_eq!(batch.num_rows(), 2);
        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, vec!["timestamp", "source", "process_time", "max_temp"]);

        let timestamps = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(timestamps.value(1), "2017-07-14T15:00");

        let process_times = batch
            .column(2)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(process_times.value(0), 0.25);
    }

    #[test]
    fn should_write_empty_summary() {
        let temp_file = NamedTempFile::new().unwrap();
        save_summary(&[], temp_file.path()).unwrap();

        let file = fs::File::open(temp_file.path()).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();

        let rows: usize = reader.map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(rows, 0);
    }
}
