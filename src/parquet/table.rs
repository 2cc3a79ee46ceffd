//! Save one reconciled station table to a parquet file.

use std::{fs::File, path::Path, sync::Arc};

use arrow::{
    array::{ArrayRef, Float64Builder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::{arrow::ArrowWriter, file::properties::WriterProperties};

use crate::{error::SinkError, schema::ReconciledTable};

pub fn save_table(table: &ReconciledTable, file_path: &Path) -> Result<(), SinkError> {
    let file = File::create(file_path)?;

    // Every observation column may hold gaps
    let schema = Arc::new(Schema::new(
        table
            .fields
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, true))
            .collect::<Vec<_>>(),
    ));

    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

    let num_rows = table.num_rows();
    let mut builders: Vec<Float64Builder> = table
        .fields
        .iter()
        .map(|_| Float64Builder::with_capacity(num_rows))
        .collect();

    for row in &table.rows {
        for (builder, cell) in builders.iter_mut().zip(row) {
            builder.append_option(*cell);
        }
    }

    let columns: Vec<ArrayRef> = builders
        .iter_mut()
        .map(|b| Arc::new(b.finish()) as ArrayRef)
        .collect();

    let batch = RecordBatch::try_new(schema, columns)?;

    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------
