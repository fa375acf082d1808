/*
* Temperature Dashboard Configuration Management
* ----------------------------------------------
* @status: works-on-my-machine-certified
*
* Welcome to the configuration wonderland! This is where we decide how the
* dashboard behaves (or misbehaves, depending on ur config values lol).
*
* Configuration Hierarchy (from lowest to highest priority):
* -----------------------------------------------------
* 1. Hardcoded defaults (for when everything else fails spectacularly)
* 2. default.toml (base configuration, like ur morning coffee - essential)
* 3. local.toml (environment-specific, like ur secret energy drink stash)
* 4. Environment variables (for DevOps people who love SCREAMING_SNAKE_CASE)
*
* Core Components:
* --------------
* 1. ServerSettings:
*    - host/port: where the dashboard API listens
*    - api_prefix: because we might change our minds about /api/v1 later
*
* 2. WeatherSettings:
*    - base_url: the OpenWeatherMap-compatible endpoint
*    - api_key: keep it in APP_WEATHER__API_KEY, not in git (please)
*    - request_timeout_secs: how long we wait before giving up on the sky
*
* 3. DatasetSettings:
*    - default_csv_path: the built-in dataset served before anyone uploads
*    - max_upload_bytes: because someone will try to upload their entire
*      national archive
*
* Pro Tips:
* --------
* 1. Always check your config values (trust no one, especially yourself)
* 2. Keep the API key in environment variables (it wants privacy too)
* 3. Use reasonable defaults (because users never read documentation anyway)
*/

use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub weather: WeatherSettings,
    pub dataset: DatasetSettings,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub api_prefix: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WeatherSettings {
    pub base_url: String,
    pub api_key: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetSettings {
    pub default_csv_path: PathBuf,
    pub max_upload_bytes: usize,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string());

        info!("Loading configuration from path: {}", config_path);

        let config = Self::defaults()?
            // Add configuration from files
            .add_source(File::with_name(&format!("{}/default", config_path)).required(false))
            .add_source(File::with_name(&format!("{}/local", config_path)).required(false))
            // Add environment variables with prefix "APP_"
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn new_from_file(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::defaults()?
            .add_source(File::from(path))
            .build()?;
        config.try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.api_prefix", "/api/v1")?
            .set_default(
                "weather.base_url",
                "http://api.openweathermap.org/data/2.5/weather",
            )?
            .set_default("weather.api_key", "")?
            .set_default("weather.request_timeout_secs", 30)?
            .set_default("dataset.default_csv_path", "data/temperature_data.csv")?
            .set_default("dataset.max_upload_bytes", 16 * 1024 * 1024)?)
    }
}

pub fn generate_default_config() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
            api_prefix: "/api/v1".to_string(),
        },
        weather: WeatherSettings {
            base_url: "http://api.openweathermap.org/data/2.5/weather".to_string(),
            api_key: String::new(),
            request_timeout_secs: 30,
        },
        dataset: DatasetSettings {
            default_csv_path: PathBuf::from("data/temperature_data.csv"),
            max_upload_bytes: 16 * 1024 * 1024,
        },
    }
}
