// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Query validation.
//!
//! Every rule is checked and every failure is reported; rules on the same
//! field do not stop at the first failure.

use crate::model::Query;
use crate::notification::Notifications;
use regex::Regex;
use std::sync::LazyLock;

pub const DATE_EMPTY: &str = "Date cannot be empty";
pub const DATE_FORMAT: &str = "Date is not in correct format, try yyyy-mm-dd";
pub const DEVICE_EMPTY: &str = "Device Id cannot be empty";
pub const SENSOR_TYPE_EMPTY: &str = "Sensor Type cannot be empty";
pub const SENSOR_TYPE_INVALID: &str = "The Sensor Type is invalid for this operation";

// Shape only; calendar validity is checked when the response date is built
static DATE_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$"));

/// Which rules apply to a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSet {
    /// Date and device rules
    Default,
    /// Date, device and sensor-type rules
    BySensorType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryField {
    Date,
    DeviceId,
    SensorType,
}

/// One failed rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub field: QueryField,
    pub message: &'static str,
}

impl ValidationFailure {
    fn new(field: QueryField, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// A query that passed validation.
///
/// The sensor type, when present, is the configured spelling rather than
/// the caller's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    device_id: String,
    date: String,
    sensor_type: Option<String>,
}

impl ValidatedQuery {
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    #[must_use]
    pub fn sensor_type(&self) -> Option<&str> {
        self.sensor_type.as_deref()
    }
}

/// Validates queries against the configured sensor types
#[derive(Debug, Clone)]
pub struct QueryValidator {
    sensor_types: Vec<String>,
}

impl QueryValidator {
    pub fn new<I, S>(sensor_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sensor_types: sensor_types.into_iter().map(Into::into).collect(),
        }
    }

    /// Check `query` against `rules`
    pub fn validate(
        &self,
        query: &Query,
        rules: RuleSet,
    ) -> Result<ValidatedQuery, Vec<ValidationFailure>> {
        let mut failures = Vec::new();

        if is_blank(&query.date) {
            failures.push(ValidationFailure::new(QueryField::Date, DATE_EMPTY));
        }
        if !is_date_shaped(&query.date) {
            failures.push(ValidationFailure::new(QueryField::Date, DATE_FORMAT));
        }

        if is_blank(&query.device_id) {
            failures.push(ValidationFailure::new(QueryField::DeviceId, DEVICE_EMPTY));
        }

        let mut canonical = None;
        if rules == RuleSet::BySensorType {
            let requested = query.sensor_type.as_deref().unwrap_or_default();
            if is_blank(requested) {
                failures.push(ValidationFailure::new(
                    QueryField::SensorType,
                    SENSOR_TYPE_EMPTY,
                ));
            }
            canonical = self.canonical(requested);
            if canonical.is_none() {
                failures.push(ValidationFailure::new(
                    QueryField::SensorType,
                    SENSOR_TYPE_INVALID,
                ));
            }
        }

        if !failures.is_empty() {
            return Err(failures);
        }

        Ok(ValidatedQuery {
            device_id: query.device_id.clone(),
            date: query.date.clone(),
            sensor_type: canonical.map(str::to_string),
        })
    }

    /// Like [`validate`](Self::validate), but records each failure as an
    /// Error notification and returns `None` on failure.
    pub fn validate_into(
        &self,
        notifications: &mut Notifications,
        query: &Query,
        rules: RuleSet,
    ) -> Option<ValidatedQuery> {
        match self.validate(query, rules) {
            Ok(validated) => Some(validated),
            Err(failures) => {
                notifications.errors(failures.iter().map(|f| f.message));
                None
            }
        }
    }

    fn canonical(&self, requested: &str) -> Option<&str> {
        if requested.is_empty() {
            return None;
        }
        self.sensor_types
            .iter()
            .find(|known| known.eq_ignore_ascii_case(requested))
            .map(String::as_str)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_date_shaped(value: &str) -> bool {
    match &*DATE_PATTERN {
        Ok(pattern) => pattern.is_match(value),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> QueryValidator {
        QueryValidator::new(["temperature", "humidity", "rainfall"])
    }

    fn messages(result: Result<ValidatedQuery, Vec<ValidationFailure>>) -> Vec<&'static str> {
        result.unwrap_err().into_iter().map(|f| f.message).collect()
    }

    #[test]
    fn test_valid_device_query() {
        let validated = validator()
            .validate(&Query::device("dockan", "2019-01-10"), RuleSet::Default)
            .unwrap();
        assert_eq!(validated.device_id(), "dockan");
        assert_eq!(validated.date(), "2019-01-10");
        assert_eq!(validated.sensor_type(), None);
    }

    #[test]
    fn test_date_shape() {
        let v = validator();
        for date in ["2019-01-10", "0000-00-00", "2019-02-31"] {
            assert!(v.validate(&Query::device("d", date), RuleSet::Default).is_ok(), "{date}");
        }
        for date in ["2019/01/10", "10-01-2019", "2019-1-10", "2019-01-10T00:00", " 2019-01-10", "२०१९-०१-१०"] {
            assert_eq!(
                messages(v.validate(&Query::device("d", date), RuleSet::Default)),
                vec![DATE_FORMAT],
                "{date}"
            );
        }
    }

    #[test]
    fn test_empty_date_reports_both_rules() {
        assert_eq!(
            messages(validator().validate(&Query::device("dockan", ""), RuleSet::Default)),
            vec![DATE_EMPTY, DATE_FORMAT]
        );
    }

    #[test]
    fn test_all_failures_collected() {
        assert_eq!(
            messages(validator().validate(&Query::device_sensor("", "", ""), RuleSet::BySensorType)),
            vec![
                DATE_EMPTY,
                DATE_FORMAT,
                DEVICE_EMPTY,
                SENSOR_TYPE_EMPTY,
                SENSOR_TYPE_INVALID
            ]
        );
    }

    #[test]
    fn test_blank_device() {
        let failures = validator()
            .validate(&Query::device("  ", "2019-01-10"), RuleSet::Default)
            .unwrap_err();
        assert_eq!(
            failures,
            vec![ValidationFailure::new(QueryField::DeviceId, DEVICE_EMPTY)]
        );
    }

    #[test]
    fn test_sensor_type_case_insensitive_and_canonical() {
        let validated = validator()
            .validate(
                &Query::device_sensor("dockan", "2019-01-10", "HuMiDiTy"),
                RuleSet::BySensorType,
            )
            .unwrap();
        assert_eq!(validated.sensor_type(), Some("humidity"));
    }

    #[test]
    fn test_unknown_sensor_type() {
        for sensor in ["wind", "temp", "temperatures", " humidity"] {
            assert_eq!(
                messages(validator().validate(
                    &Query::device_sensor("dockan", "2019-01-10", sensor),
                    RuleSet::BySensorType
                )),
                vec![SENSOR_TYPE_INVALID],
                "{sensor}"
            );
        }
    }

    #[test]
    fn test_default_rules_ignore_sensor_type() {
        let validated = validator()
            .validate(
                &Query::device_sensor("dockan", "2019-01-10", "wind"),
                RuleSet::Default,
            )
            .unwrap();
        assert_eq!(validated.sensor_type(), None);
    }

    #[test]
    fn test_missing_sensor_type_under_sensor_rules() {
        assert_eq!(
            messages(validator().validate(&Query::device("dockan", "2019-01-10"), RuleSet::BySensorType)),
            vec![SENSOR_TYPE_EMPTY, SENSOR_TYPE_INVALID]
        );
    }

    #[test]
    fn test_validate_into_records_errors() {
        let mut notifications = Notifications::new();
        let result = validator().validate_into(
            &mut notifications,
            &Query::device("", "2019-01-10"),
            RuleSet::Default,
        );
        assert!(result.is_none());
        assert!(notifications.has_errors());
        assert_eq!(
            notifications.messages(crate::Severity::Error).collect::<Vec<_>>(),
            vec![DEVICE_EMPTY]
        );
    }
}
