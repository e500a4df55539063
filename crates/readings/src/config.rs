// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::Result;
use crate::csv::CsvOptions;
use crate::error::ReadingsError;
use crate::store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Where record files live and how they are named
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WeatherConfig {
    /// Suffix of per-day record files, e.g. ".csv"
    #[serde(default = "default_extension")]
    pub records_file_extension: String,

    /// Name of the per-sensor historical archive, e.g. "historical.zip"
    #[serde(default = "default_historical_record")]
    pub historical_record: String,

    /// Recognized sensor types, in response order
    #[serde(default = "default_sensor_types")]
    pub sensor_types: Vec<String>,

    #[serde(default)]
    pub csv: CsvOptions,

    #[serde(default)]
    pub store: StoreConfig,
}

fn default_extension() -> String {
    ".csv".to_string()
}

fn default_historical_record() -> String {
    "historical.zip".to_string()
}

fn default_sensor_types() -> Vec<String> {
    vec![
        "temperature".to_string(),
        "humidity".to_string(),
        "rainfall".to_string(),
    ]
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            records_file_extension: default_extension(),
            historical_record: default_historical_record(),
            sensor_types: default_sensor_types(),
            csv: CsvOptions::default(),
            store: StoreConfig {
                url: "./data".to_string(),
                ..Default::default()
            },
        }
    }
}

impl WeatherConfig {
    /// Per-day record file name for `date`
    #[must_use]
    pub fn record_file_name(&self, date: &str) -> String {
        format!("{}{}", date, self.records_file_extension)
    }
}

/// Load configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<WeatherConfig> {
    let content = std::fs::read_to_string(&path).map_err(|e| {
        ReadingsError::Configuration(format!(
            "Failed to read config file {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;

    parse_config(&content)
}

/// Parse and validate YAML configuration text
pub fn parse_config(content: &str) -> Result<WeatherConfig> {
    let config: WeatherConfig = serde_yaml_ng::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration
pub fn validate_config(config: &WeatherConfig) -> Result<()> {
    if config.records_file_extension.is_empty() {
        return Err("records_file_extension cannot be empty".to_string().into());
    }

    if config.historical_record.is_empty() {
        return Err("historical_record cannot be empty".to_string().into());
    }

    if config.sensor_types.is_empty() {
        return Err("At least one sensor type must be configured".to_string().into());
    }

    let mut seen = HashSet::new();
    for sensor_type in &config.sensor_types {
        if sensor_type.trim().is_empty() {
            return Err("Sensor type names cannot be empty".to_string().into());
        }
        if !seen.insert(sensor_type.to_ascii_lowercase()) {
            return Err(format!("Sensor type '{}' is configured more than once", sensor_type).into());
        }
    }

    config.csv.validate()
}

/// Write an example configuration file
pub async fn create_example_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let example = WeatherConfig::default();
    let body = serde_yaml_ng::to_string(&example)?;

    let text = format!(
        "# Weather readings configuration\n\
         #\n\
         # store.url accepts file:///path, a plain path, memory:// or s3://bucket/prefix.\n\
         # For S3 also set region, access_key, secret_key and optionally endpoint.\n\
         # sensor_types order is the order lists are resolved in.\n\
         \n\
         {body}"
    );

    tokio::fs::write(path, text).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WeatherConfig::default();
        assert_eq!(config.records_file_extension, ".csv");
        assert_eq!(config.historical_record, "historical.zip");
        assert_eq!(config.sensor_types, vec!["temperature", "humidity", "rainfall"]);
        assert_eq!(config.record_file_name("2019-01-10"), "2019-01-10.csv");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_parse_minimal_yaml_uses_defaults() {
        let config = parse_config("store:\n  url: memory://\n").unwrap();
        assert_eq!(config.store.url, "memory://");
        assert_eq!(config.sensor_types.len(), 3);
        assert_eq!(config.csv.delimiter, ';');
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
records_file_extension: ".txt"
historical_record: "archive.zip"
sensor_types: [rainfall, temperature]
csv:
  delimiter: ","
  has_header: true
store:
  url: "s3://bucket/weather"
  region: "eu-north-1"
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.record_file_name("2019-01-10"), "2019-01-10.txt");
        assert_eq!(config.historical_record, "archive.zip");
        assert_eq!(config.sensor_types, vec!["rainfall", "temperature"]);
        assert_eq!(config.csv.delimiter, ',');
        assert!(config.csv.has_header);
        assert_eq!(config.store.region, "eu-north-1");
    }

    #[test]
    fn test_validate_rejects_bad_sensor_types() {
        let mut config = WeatherConfig::default();
        config.sensor_types = vec![];
        assert!(validate_config(&config).is_err());

        config.sensor_types = vec!["temperature".to_string(), " ".to_string()];
        assert!(validate_config(&config).is_err());

        config.sensor_types = vec!["temperature".to_string(), "Temperature".to_string()];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_names() {
        let mut config = WeatherConfig::default();
        config.records_file_extension.clear();
        assert!(validate_config(&config).is_err());

        let mut config = WeatherConfig::default();
        config.historical_record.clear();
        assert!(validate_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_example_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather-config.yaml");

        create_example_config(&path).await.unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, WeatherConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config("/nonexistent/weather-config.yaml").unwrap_err();
        assert!(matches!(err, ReadingsError::Configuration(_)));
    }
}
