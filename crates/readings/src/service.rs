// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Response assembly.
//!
//! Each entry point validates, resolves and builds one [`WeatherResponse`].
//! Expected failures leave their reasons in the caller's [`Notifications`]
//! and return `Ok(None)`. Sensor types are resolved one at a time in
//! configured order.

use crate::Result;
use crate::config::WeatherConfig;
use crate::error::ReadingsError;
use crate::model::{Query, SensorKind, SensorRecord, WeatherResponse};
use crate::notification::Notifications;
use crate::resolver::RecordResolver;
use crate::store::ContentStore;
use crate::validation::{QueryValidator, RuleSet};
use chrono::NaiveDate;
use diagnostics::*;
use std::sync::Arc;

pub struct WeatherService<S> {
    validator: QueryValidator,
    resolver: RecordResolver<S>,
    config: Arc<WeatherConfig>,
}

impl<S: ContentStore> WeatherService<S> {
    pub fn new(store: S, config: WeatherConfig) -> Self {
        let config = Arc::new(config);
        Self {
            validator: QueryValidator::new(config.sensor_types.iter().cloned()),
            resolver: RecordResolver::new(store, config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }

    /// Readings of every configured sensor type.
    ///
    /// All or nothing: if any sensor type fails to resolve, no response is
    /// returned, even when the others succeeded.
    pub async fn resolve_device(
        &self,
        notifications: &mut Notifications,
        device_id: &str,
        date: &str,
    ) -> Result<Option<WeatherResponse>> {
        let query = Query::device(device_id, date);
        let Some(validated) = self
            .validator
            .validate_into(notifications, &query, RuleSet::Default)
        else {
            return Ok(None);
        };

        info!("Resolving all sensor types for {device_id} on {date}", device_id, date);
        let mut response = self.new_response(validated.date())?;

        for sensor_type in self.config.sensor_types.iter().map(String::as_str) {
            let Some(records) = self
                .resolver
                .resolve_into(notifications, validated.device_id(), validated.date(), sensor_type)
                .await?
            else {
                warn!(
                    "Aborting {device_id} on {date}: {sensor_type} did not resolve",
                    device_id, date, sensor_type
                );
                return Ok(None);
            };

            store_list(&mut response, sensor_type, records);
        }

        Ok(Some(response))
    }

    /// Readings of one sensor type
    pub async fn resolve_device_sensor(
        &self,
        notifications: &mut Notifications,
        device_id: &str,
        date: &str,
        sensor_type: &str,
    ) -> Result<Option<WeatherResponse>> {
        let query = Query::device_sensor(device_id, date, sensor_type);
        let Some(validated) =
            self.validator
                .validate_into(notifications, &query, RuleSet::BySensorType)
        else {
            return Ok(None);
        };
        let Some(canonical) = validated.sensor_type() else {
            return Ok(None);
        };

        info!("Resolving {canonical} for {device_id} on {date}", canonical, device_id, date);
        let Some(records) = self
            .resolver
            .resolve_into(notifications, validated.device_id(), validated.date(), canonical)
            .await?
        else {
            return Ok(None);
        };

        let mut response = self.new_response(validated.date())?;
        store_list(&mut response, canonical, records);
        Ok(Some(response))
    }

    fn new_response(&self, date: &str) -> Result<WeatherResponse> {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ReadingsError::InvalidDate(date.to_string()))?;
        Ok(WeatherResponse::new(parsed, self.config.record_file_name(date)))
    }
}

fn store_list(
    response: &mut WeatherResponse,
    sensor_type: &str,
    records: Vec<SensorRecord>,
) {
    if !response.set_list(SensorKind::from_name(sensor_type), records) {
        warn!("Sensor type {sensor_type} has no response list, records dropped", sensor_type);
    }
}
