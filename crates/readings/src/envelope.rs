// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::Result;
use crate::notification::{Notification, Notifications};
use diagnostics::*;
use serde::Serialize;

/// Notification used when an unexpected fault aborts a request
pub const UNEXPECTED_FAILURE: &str = "Something went wrong recovering the device records";

/// What a caller sends back for one query
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub success: bool,
    pub notifications: Vec<Notification>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// `success` is false when any Error notification was recorded, and
    /// `data` is then dropped.
    pub fn new(notifications: Notifications, data: Option<T>) -> Self {
        let success = !notifications.has_errors();
        Self {
            success,
            notifications: notifications.into_vec(),
            data: if success { data } else { None },
        }
    }

    /// Build an envelope from an assembler result, turning an `Err` into
    /// the generic failure notification.
    pub fn from_result(mut notifications: Notifications, result: Result<Option<T>>) -> Self {
        match result {
            Ok(data) => Self::new(notifications, data),
            Err(e) => {
                let cause = e.to_string();
                error!("Request failed: {cause}", cause);
                notifications.error(UNEXPECTED_FAILURE);
                Self::new(notifications, None)
            }
        }
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReadingsError;

    #[test]
    fn test_success_keeps_data() {
        let envelope = Envelope::new(Notifications::new(), Some(7));
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(7));
    }

    #[test]
    fn test_errors_drop_data() {
        let mut notifications = Notifications::new();
        notifications.information("partial");
        notifications.error("File 2019-01-10.csv could not be found");
        let envelope = Envelope::new(notifications, Some(7));
        assert!(!envelope.success);
        assert_eq!(envelope.data, None);
        assert_eq!(envelope.notifications.len(), 2);
    }

    #[test]
    fn test_from_result_translates_fault() {
        let envelope: Envelope<i32> = Envelope::from_result(
            Notifications::new(),
            Err(ReadingsError::InvalidDate("2019-02-31".to_string())),
        );
        assert!(!envelope.success);
        assert_eq!(envelope.notifications[0].message, UNEXPECTED_FAILURE);
    }

    #[test]
    fn test_json_shape() {
        let mut notifications = Notifications::new();
        notifications.error("Device Id cannot be empty");
        let envelope: Envelope<i32> = Envelope::from_result(notifications, Ok(None));
        let json: serde_json::Value =
            serde_json::from_str(&envelope.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["data"], serde_json::Value::Null);
        assert_eq!(json["notifications"][0]["message"], "Device Id cannot be empty");
        assert_eq!(json["notifications"][0]["type"], "Error");
    }
}
