// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Delimited record parsing.
//!
//! Decoding is done by arrow_csv against a schema that each record shape
//! declares statically through [`RecordSchema`]. No header row is expected
//! by default and fields are mapped by position; a row must have exactly
//! as many fields as the schema declares.

use crate::error::ReadingsError;
use crate::model::{SensorKind, SensorRecord, normalize_numeric};
use crate::Result;
use arrow_array::{Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};

/// Delimited text options.
///
/// Mirrors the arrow_csv reader knobs. Defaults match the per-day record
/// files: semicolon separated, no header.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter (default: ';')
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Whether the first row is a header (default: false)
    #[serde(default)]
    pub has_header: bool,

    /// Rows decoded per batch (default: 8192)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Quote character (default: '"')
    #[serde(default = "default_quote")]
    pub quote: char,

    /// Escape character (default: None)
    #[serde(default)]
    pub escape: Option<char>,
}

fn default_delimiter() -> char {
    ';'
}
fn default_batch_size() -> usize {
    8192
}
fn default_quote() -> char {
    '"'
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            has_header: false,
            batch_size: default_batch_size(),
            quote: default_quote(),
            escape: None,
        }
    }
}

impl CsvOptions {
    /// Options must be single-byte characters for the decoder
    pub fn validate(&self) -> Result<()> {
        for (name, c) in [("delimiter", Some(self.delimiter)), ("quote", Some(self.quote)), ("escape", self.escape)] {
            if let Some(c) = c {
                if !c.is_ascii() {
                    return Err(ReadingsError::Configuration(format!(
                        "csv {name} must be an ASCII character, got '{c}'"
                    )));
                }
            }
        }
        if self.batch_size == 0 {
            return Err(ReadingsError::Configuration(
                "csv batch_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// A record shape with a statically declared column layout.
pub trait RecordSchema: Sized {
    /// Arrow schema the decoder is built with
    fn schema() -> SchemaRef;

    /// Build one record from row `row` of `batch`. `line` is the 1-based
    /// row number across the whole input, used in error messages.
    fn from_row(batch: &RecordBatch, row: usize, line: usize) -> Result<Self>;
}

static SENSOR_RECORD_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(vec![
        Field::new("timestamp", DataType::Utf8, true),
        Field::new("value", DataType::Utf8, true),
    ]))
});

impl RecordSchema for SensorRecord {
    fn schema() -> SchemaRef {
        SENSOR_RECORD_SCHEMA.clone()
    }

    fn from_row(batch: &RecordBatch, row: usize, line: usize) -> Result<Self> {
        let timestamp_text = string_cell(batch, 0, row, line)?;
        let raw_value = string_cell(batch, 1, row, line)?;

        let timestamp = parse_timestamp(timestamp_text).ok_or_else(|| {
            ReadingsError::InvalidTimestamp {
                row: line,
                value: timestamp_text.to_string(),
            }
        })?;

        let numeric_value =
            normalize_numeric(raw_value).ok_or_else(|| ReadingsError::InvalidValue {
                row: line,
                value: raw_value.to_string(),
            })?;

        Ok(SensorRecord {
            timestamp,
            // Rows carry no kind; the resolver tags them
            sensor_type: SensorKind::Unknown,
            raw_value: raw_value.to_string(),
            numeric_value,
        })
    }
}

fn string_cell(batch: &RecordBatch, column: usize, row: usize, line: usize) -> Result<&str> {
    let array = batch
        .column(column)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| ReadingsError::MalformedRow {
            row: line,
            reason: format!("column {column} is not text"),
        })?;

    if array.is_null(row) {
        return Ok("");
    }
    Ok(array.value(row))
}

/// Parse the timestamp column.
///
/// Accepts RFC 3339 (the offset is dropped, keeping wall-clock time),
/// `YYYY-MM-DDTHH:MM:SS[.f]`, `YYYY-MM-DD HH:MM:SS[.f]` and a bare date
/// (midnight).
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Decode delimited `content` into records of shape `T`.
///
/// Empty input yields an empty vector, not an error.
pub fn parse_records<T: RecordSchema>(content: &[u8], options: &CsvOptions) -> Result<Vec<T>> {
    options.validate()?;

    let mut builder = arrow_csv::ReaderBuilder::new(T::schema())
        .with_delimiter(options.delimiter as u8)
        .with_header(options.has_header)
        .with_batch_size(options.batch_size)
        .with_quote(options.quote as u8);

    if let Some(escape) = options.escape {
        builder = builder.with_escape(escape as u8);
    }

    let reader = builder.build(std::io::Cursor::new(content))?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch?;
        for row in 0..batch.num_rows() {
            let line = records.len() + 1;
            records.push(T::from_row(&batch, row, line)?);
        }
    }

    Ok(records)
}
