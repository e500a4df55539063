// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use diagnostics::*;
use readings::{ObjectContentStore, WeatherConfig, WeatherService};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "WEATHER_CONFIG";

/// Configuration file used when neither the flag nor the variable is set
pub const DEFAULT_CONFIG_FILE: &str = "weather-config.yaml";

/// Per-invocation state shared by every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config_path: PathBuf,
}

impl CommandContext {
    pub fn new(override_path: Option<PathBuf>) -> Self {
        Self {
            config_path: get_config_path_with_override(override_path),
        }
    }

    /// Load and validate the configuration file
    pub fn load_config(&self) -> Result<WeatherConfig> {
        let path = self.config_path.display().to_string();
        debug!("Loading configuration from {path}", path);
        readings::load_config(&self.config_path)
            .with_context(|| format!("Failed to load configuration from {path}"))
    }

    /// Build the service over the configured object store
    pub fn service(&self) -> Result<WeatherService<ObjectContentStore>> {
        let config = self.load_config()?;
        let store = readings::build_content_store(&config.store)
            .with_context(|| format!("Failed to open store '{}'", config.store.url))?;
        Ok(WeatherService::new(store, config))
    }
}

/// Config path from the flag, then `WEATHER_CONFIG`, then the default file name
pub fn get_config_path_with_override(override_path: Option<PathBuf>) -> PathBuf {
    if let Some(path) = override_path {
        return path;
    }

    env::var(CONFIG_ENV_VAR)
        .ok()
        .filter(|value| !value.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
}
