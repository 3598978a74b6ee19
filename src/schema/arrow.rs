// src/schema/arrow.rs

use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Float64Array, StringArray},
    datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

use crate::process::Table;
use crate::report::ChangeRecord;

/// All-Utf8 Arrow schema with one nullable field per header.
pub fn string_schema(headers: &[String]) -> Arc<ArrowSchema> {
    let fields: Vec<ArrowField> = headers
        .iter()
        .map(|name| ArrowField::new(name, DataType::Utf8, /* nullable = */ true))
        .collect();
    Arc::new(ArrowSchema::new(fields))
}

/// Columnar copy of `table`. Empty cells become nulls.
pub fn table_to_batch(table: &Table) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = (0..table.width())
        .map(|col| {
            let arr: StringArray = table
                .rows
                .iter()
                .map(|row| Some(row[col].as_str()).filter(|v| !v.is_empty()))
                .collect();
            Arc::new(arr) as ArrayRef
        })
        .collect();

    RecordBatch::try_new(string_schema(&table.headers), columns)
        .context("building record batch from table")
}

/// `table` plus `change_percentage` (Float64) and `status` (Utf8) columns,
/// one change record per table row.
pub fn change_records_to_batch(table: &Table, changes: &[ChangeRecord]) -> Result<RecordBatch> {
    anyhow::ensure!(
        table.len() == changes.len(),
        "{} change records for {} table rows",
        changes.len(),
        table.len()
    );

    let base = table_to_batch(table)?;
    let mut fields: Vec<ArrowField> = base
        .schema()
        .fields()
        .iter()
        .map(|f| (**f).clone())
        .collect();
    fields.push(ArrowField::new("change_percentage", DataType::Float64, true));
    fields.push(ArrowField::new("status", DataType::Utf8, true));

    let pct: Float64Array = changes.iter().map(|c| c.change_percentage).collect();
    let status: StringArray = changes
        .iter()
        .map(|c| c.status.map(|s| s.as_str()))
        .collect();

    let mut columns = base.columns().to_vec();
    columns.push(Arc::new(pct) as ArrayRef);
    columns.push(Arc::new(status) as ArrayRef);

    RecordBatch::try_new(Arc::new(ArrowSchema::new(fields)), columns)
        .context("building change record batch")
}
