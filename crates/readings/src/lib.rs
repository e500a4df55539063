// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Sensor reading resolution for weather stations.
//!
//! Answers "readings of device D on date T", optionally for one sensor
//! type, from an object store laid out as
//! `{device}/{sensor_type}/{date}{extension}` with a per-sensor historical
//! archive `{device}/{sensor_type}/{historical_record}` as fallback.
//!
//! # Architecture
//!
//! - **WeatherService**: validates a query and assembles the response
//! - **QueryValidator**: date, device and sensor-type rules
//! - **RecordResolver**: direct file first, historical archive second
//! - **HistoricalArchive**: ZIP member lookup by file name
//! - **parse_records**: `arrow_csv` decoding against a static schema
//! - **Notifications**: per-request messages for the caller
//!
//! Expected outcomes (invalid input, missing or empty files) are reported
//! through [`Notifications`]; only unexpected faults are [`ReadingsError`].

pub mod archive;
pub mod config;
pub mod csv;
pub mod envelope;
pub mod error;
pub mod model;
pub mod notification;
pub mod resolver;
pub mod service;
pub mod store;
pub mod validation;

pub use crate::archive::HistoricalArchive;
pub use crate::config::{WeatherConfig, create_example_config, load_config, validate_config};
pub use crate::csv::{CsvOptions, RecordSchema, parse_records};
pub use crate::envelope::Envelope;
pub use crate::error::ReadingsError;
pub use crate::model::{Query, SensorKind, SensorRecord, WeatherResponse, normalize_numeric};
pub use crate::notification::{Notification, Notifications, Severity};
pub use crate::resolver::{RecordResolver, Resolution, Tier};
pub use crate::service::WeatherService;
pub use crate::store::{
    ContentStore, ObjectContentStore, RetrievedContent, StoreConfig, build_content_store,
};
pub use crate::validation::{QueryValidator, RuleSet, ValidatedQuery, ValidationFailure};

pub type Result<T> = std::result::Result<T, ReadingsError>;
