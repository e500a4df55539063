// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Two-tier record lookup for one (device, date, sensor type).
//!
//! The direct per-day file is fetched first. Only when it is absent is the
//! historical archive fetched and searched for a member of the same name.

use crate::Result;
use crate::archive::HistoricalArchive;
use crate::config::WeatherConfig;
use crate::csv::parse_records;
use crate::model::{SensorKind, SensorRecord};
use crate::notification::Notifications;
use crate::store::ContentStore;
use diagnostics::*;
use std::sync::Arc;

/// Where resolved records came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Direct,
    Historical,
}

/// Outcome of resolving one sensor type
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// At least one record, tagged with the resolved kind
    Records {
        tier: Tier,
        records: Vec<SensorRecord>,
    },
    /// Neither tier had `file_name`
    NotFound { file_name: String },
    /// `file_name` was found but held no rows
    NoRecords { file_name: String },
}

impl Resolution {
    /// Notification text for a failed resolution
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Resolution::Records { .. } => None,
            Resolution::NotFound { file_name } => {
                Some(format!("File {file_name} could not be found"))
            }
            Resolution::NoRecords { file_name } => {
                Some(format!("No records found for file {file_name}"))
            }
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Resolution::Records { .. })
    }

    pub fn into_records(self) -> Option<Vec<SensorRecord>> {
        match self {
            Resolution::Records { records, .. } => Some(records),
            _ => None,
        }
    }
}

/// Resolves sensor records from a [`ContentStore`]
pub struct RecordResolver<S> {
    store: S,
    config: Arc<WeatherConfig>,
}

impl<S: ContentStore> RecordResolver<S> {
    pub fn new(store: S, config: Arc<WeatherConfig>) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }

    /// Run the two-tier lookup for one sensor type.
    ///
    /// Missing and empty files are returned as [`Resolution`] values.
    /// Transport faults, corrupt archives and malformed rows are errors.
    pub async fn resolve(
        &self,
        device_id: &str,
        date: &str,
        sensor_type: &str,
    ) -> Result<Resolution> {
        let file_name = self.config.record_file_name(date);
        let kind = SensorKind::from_name(sensor_type);

        let direct_path = format!("{device_id}/{sensor_type}/{file_name}");
        let (tier, content) = match self.store.fetch(&direct_path).await? {
            Some(found) => {
                debug!("Direct hit {direct_path}", direct_path);
                (Tier::Direct, found.content)
            }
            None => {
                let historical_path =
                    format!("{}/{}/{}", device_id, sensor_type, self.config.historical_record);
                info!(
                    "Direct file {direct_path} missing, trying {historical_path}",
                    direct_path, historical_path
                );

                let Some(found) = self.store.fetch(&historical_path).await? else {
                    warn!("No direct file or historical archive for {direct_path}", direct_path);
                    return Ok(Resolution::NotFound { file_name });
                };

                let mut archive = HistoricalArchive::open(found.content)?;
                let Some(member) = archive.lookup(&file_name)? else {
                    warn!(
                        "Historical archive {historical_path} has no member {file_name}",
                        historical_path, file_name
                    );
                    return Ok(Resolution::NotFound { file_name });
                };
                (Tier::Historical, member)
            }
        };

        let records: Vec<SensorRecord> = parse_records(&content, &self.config.csv)?;
        if records.is_empty() {
            warn!(
                "Record file {file_name} for {device_id}/{sensor_type} is empty",
                file_name, device_id, sensor_type
            );
            return Ok(Resolution::NoRecords { file_name });
        }

        let count = records.len();
        debug!(
            "Resolved {count} {sensor_type} records for {device_id} on {date}",
            count, sensor_type, device_id, date
        );

        Ok(Resolution::Records {
            tier,
            records: records.into_iter().map(|r| r.with_kind(kind)).collect(),
        })
    }

    /// Resolve and record any failure as an Error notification.
    ///
    /// Returns the records on success and `None` otherwise.
    pub async fn resolve_into(
        &self,
        notifications: &mut Notifications,
        device_id: &str,
        date: &str,
        sensor_type: &str,
    ) -> Result<Option<Vec<SensorRecord>>> {
        let resolution = self.resolve(device_id, date, sensor_type).await?;
        if let Some(message) = resolution.failure_message() {
            notifications.error(message);
        }
        Ok(resolution.into_records())
    }
}
