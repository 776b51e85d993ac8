// Copyright 2024 RisingLight Project Authors. Licensed under Apache-2.0.

use std::iter;

use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use comfy_table::presets::ASCII_MARKDOWN;
use comfy_table::Table;

/// The full result of a query, held in memory until it is printed.
#[derive(Debug, Default)]
pub struct QueryResult {
    schema: Option<SchemaRef>,
    batches: Vec<RecordBatch>,
}

impl QueryResult {
    pub fn new(schema: Option<SchemaRef>, batches: Vec<RecordBatch>) -> Self {
        Self { schema, batches }
    }

    /// Schema of the result, falling back to the first batch's.
    pub fn schema(&self) -> Option<SchemaRef> {
        self.schema
            .clone()
            .or_else(|| self.batches.first().map(|b| b.schema()))
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Return the number of rows over all batches.
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }

    /// Render the result as a markdown table.
    ///
    /// The first column is an unnamed row index, counted across batches.
    pub fn to_markdown(&self) -> Result<String, ArrowError> {
        let Some(schema) = self.schema() else {
            return Ok("Empty result".to_string());
        };
        let mut table = Table::new();
        table.load_preset(ASCII_MARKDOWN);
        table.set_header(
            iter::once(String::new()).chain(schema.fields().iter().map(|f| f.name().clone())),
        );

        let options = FormatOptions::default();
        let mut index = 0usize;
        for batch in &self.batches {
            let formatters = batch
                .columns()
                .iter()
                .map(|array| ArrayFormatter::try_new(array.as_ref(), &options))
                .collect::<Result<Vec<_>, _>>()?;
            for row in 0..batch.num_rows() {
                let values = formatters.iter().map(|f| f.value(row).to_string());
                table.add_row(iter::once(index.to_string()).chain(values));
                index += 1;
            }
        }
        Ok(table.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{ArrayRef, Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};

    use super::*;

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("host", DataType::Utf8, true),
            Field::new("usage", DataType::Float64, true),
        ]))
    }

    fn batch(hosts: Vec<Option<&str>>, usage: Vec<Option<f64>>) -> RecordBatch {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(hosts)),
            Arc::new(Float64Array::from(usage)),
        ];
        RecordBatch::try_new(schema(), columns).unwrap()
    }

    /// Split a markdown table into trimmed cells, dropping the outer borders.
    fn cells(markdown: &str) -> Vec<Vec<String>> {
        markdown
            .lines()
            .map(|line| {
                let line = line.trim();
                let inner = line.trim_start_matches('|').trim_end_matches('|');
                inner.split('|').map(|c| c.trim().to_string()).collect()
            })
            .collect()
    }

    #[test]
    fn index_continues_across_batches() {
        let result = QueryResult::new(
            Some(schema()),
            vec![
                batch(vec![Some("a"), Some("b")], vec![Some(1.5), None]),
                batch(vec![Some("c")], vec![Some(0.25)]),
            ],
        );
        assert_eq!(result.num_rows(), 3);

        let rows = cells(&result.to_markdown().unwrap());
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], ["", "host", "usage"]);
        assert!(rows[1].iter().all(|c| c.chars().all(|c| c == '-')));
        assert_eq!(rows[2], ["0", "a", "1.5"]);
        assert_eq!(rows[3], ["1", "b", ""]);
        assert_eq!(rows[4], ["2", "c", "0.25"]);
    }

    #[test]
    fn header_only_without_rows() {
        let result = QueryResult::new(Some(schema()), vec![]);
        let rows = cells(&result.to_markdown().unwrap());
        assert!(rows.len() <= 2);
        assert_eq!(rows[0], ["", "host", "usage"]);
    }

    #[test]
    fn schema_from_first_batch() {
        let result = QueryResult::new(None, vec![batch(vec![Some("a")], vec![Some(1.0)])]);
        assert_eq!(result.schema().unwrap(), schema());
    }

    #[test]
    fn empty_without_schema() {
        let result = QueryResult::default();
        assert_eq!(result.to_markdown().unwrap(), "Empty result");
    }
}
