// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Unexpected faults raised by the record-resolution core.
//!
//! Validation failures, missing files and empty files are *not* errors;
//! they travel as values and end up as notifications. Everything here is
//! something the caller has to catch and translate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadingsError {
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV decode error: {0}")]
    Csv(#[from] arrow_schema::ArrowError),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("Invalid timestamp on row {row}: '{value}'")]
    InvalidTimestamp { row: usize, value: String },

    #[error("Invalid sensor value on row {row}: '{value}'")]
    InvalidValue { row: usize, value: String },

    #[error("Invalid calendar date: '{0}'")]
    InvalidDate(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<String> for ReadingsError {
    fn from(s: String) -> Self {
        ReadingsError::Configuration(s)
    }
}
