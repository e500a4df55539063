// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use diagnostics::*;
use readings::{ContentStore, Envelope, Notifications, WeatherResponse, WeatherService};

use crate::common::CommandContext;

/// All sensor types of `device` on `date`.
///
/// The envelope is handed to `handler` as pretty JSON. Returns whether the
/// envelope reports success.
pub async fn device_command<F>(
    context: &CommandContext,
    device: &str,
    date: &str,
    handler: F,
) -> Result<bool>
where
    F: FnMut(&str),
{
    let service = context.service()?;
    run_device(&service, device, date, handler).await
}

/// One sensor type of `device` on `date`
pub async fn sensor_command<F>(
    context: &CommandContext,
    device: &str,
    date: &str,
    sensor_type: &str,
    handler: F,
) -> Result<bool>
where
    F: FnMut(&str),
{
    let service = context.service()?;
    run_sensor(&service, device, date, sensor_type, handler).await
}

/// Device query against an already built service
pub async fn run_device<S, F>(
    service: &WeatherService<S>,
    device: &str,
    date: &str,
    handler: F,
) -> Result<bool>
where
    S: ContentStore,
    F: FnMut(&str),
{
    let mut notifications = Notifications::new();
    let result = service.resolve_device(&mut notifications, device, date).await;
    emit_envelope(Envelope::from_result(notifications, result), handler)
}

/// Sensor query against an already built service
pub async fn run_sensor<S, F>(
    service: &WeatherService<S>,
    device: &str,
    date: &str,
    sensor_type: &str,
    handler: F,
) -> Result<bool>
where
    S: ContentStore,
    F: FnMut(&str),
{
    let mut notifications = Notifications::new();
    let result = service
        .resolve_device_sensor(&mut notifications, device, date, sensor_type)
        .await;
    emit_envelope(Envelope::from_result(notifications, result), handler)
}

fn emit_envelope<F>(envelope: Envelope<WeatherResponse>, mut handler: F) -> Result<bool>
where
    F: FnMut(&str),
{
    let success = envelope.success;
    let count = envelope.notifications.len();
    debug!("Query finished: success={success}, {count} notifications", success, count);

    handler(&envelope.to_json_pretty()?);
    Ok(success)
}
