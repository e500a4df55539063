// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Measurement kind of a sensor record
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SensorKind {
    Temperature,
    Humidity,
    Rainfall,
    #[default]
    Unknown,
}

impl SensorKind {
    /// Case-insensitive lookup; names with no matching kind map to `Unknown`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "temperature" => SensorKind::Temperature,
            "humidity" => SensorKind::Humidity,
            "rainfall" => SensorKind::Rainfall,
            _ => SensorKind::Unknown,
        }
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Humidity => "humidity",
            SensorKind::Rainfall => "rainfall",
            SensorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// One timestamped reading.
///
/// `numeric_value` is derived from `raw_value` once, when the row is
/// parsed; see [`normalize_numeric`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SensorRecord {
    #[serde(rename = "date")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "type")]
    pub sensor_type: SensorKind,
    #[serde(rename = "value")]
    pub raw_value: String,
    #[serde(rename = "numericValue")]
    pub numeric_value: f64,
}

impl SensorRecord {
    /// Re-tag with the kind the record was resolved for
    #[must_use]
    pub fn with_kind(mut self, kind: SensorKind) -> Self {
        self.sensor_type = kind;
        self
    }
}

/// Convert a comma-decimal raw value to a float.
///
/// A leading comma gets a `0` prefix (`",5"` is `0.5`), every comma becomes
/// a dot, then the text is parsed. Returns `None` for input without a
/// digit (`","` included) or that does not parse.
pub fn normalize_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let text = if trimmed.starts_with(',') {
        format!("0{}", trimmed.replace(',', "."))
    } else {
        trimmed.replace(',', ".")
    };

    let value: f64 = text.parse().ok()?;
    value.is_finite().then_some(value)
}

/// Query for one device and date, optionally narrowed to one sensor type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub device_id: String,
    pub date: String,
    pub sensor_type: Option<String>,
}

impl Query {
    /// All configured sensor types
    pub fn device(device_id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            date: date.into(),
            sensor_type: None,
        }
    }

    /// A single sensor type
    pub fn device_sensor(
        device_id: impl Into<String>,
        date: impl Into<String>,
        sensor_type: impl Into<String>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            date: date.into(),
            sensor_type: Some(sensor_type.into()),
        }
    }
}

/// Assembled answer for one query.
///
/// A list is `None` when that kind was not part of the request; it is
/// never `Some(vec![])`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherResponse {
    pub date: NaiveDate,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_list: Option<Vec<SensorRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_list: Option<Vec<SensorRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rainfall_list: Option<Vec<SensorRecord>>,
}

impl WeatherResponse {
    pub fn new(date: NaiveDate, file_name: impl Into<String>) -> Self {
        Self {
            date,
            file_name: file_name.into(),
            temperature_list: None,
            humidity_list: None,
            rainfall_list: None,
        }
    }

    /// Store `records` in the list for `kind`. Returns false (and drops the
    /// records) for `SensorKind::Unknown`, which has no list.
    pub fn set_list(&mut self, kind: SensorKind, records: Vec<SensorRecord>) -> bool {
        let slot = match kind {
            SensorKind::Temperature => &mut self.temperature_list,
            SensorKind::Humidity => &mut self.humidity_list,
            SensorKind::Rainfall => &mut self.rainfall_list,
            SensorKind::Unknown => return false,
        };
        *slot = Some(records);
        true
    }

    #[must_use]
    pub fn list(&self, kind: SensorKind) -> Option<&[SensorRecord]> {
        match kind {
            SensorKind::Temperature => self.temperature_list.as_deref(),
            SensorKind::Humidity => self.humidity_list.as_deref(),
            SensorKind::Rainfall => self.rainfall_list.as_deref(),
            SensorKind::Unknown => None,
        }
    }
}
