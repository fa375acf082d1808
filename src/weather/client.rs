//! HTTP client for the external weather provider (OpenWeatherMap-compatible).

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::config::settings::WeatherSettings;
use crate::core::dataset::LiveReading;
use crate::core::errors::{AnomalyError, AnomalyResult};

/// The slice of the provider's response we actually consume: `main.temp`.
#[derive(Debug, Deserialize)]
struct ProviderResponse {
    main: ProviderMain,
}

#[derive(Debug, Deserialize)]
struct ProviderMain {
    temp: f64,
}

pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(settings: &WeatherSettings) -> AnomalyResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(settings, client))
    }

    /// Build from an existing client (useful for testing).
    pub fn with_client(settings: &WeatherSettings, client: Client) -> Self {
        Self {
            client,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
        }
    }

    /// One GET against the provider, no retry. Any non-200 status or
    /// unparsable body surfaces as `ExternalService`.
    pub async fn fetch_current(&self, city: &str) -> AnomalyResult<LiveReading> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnomalyError::ExternalService(format!(
                "weather provider returned {} for city '{}'",
                status, city
            )));
        }

        let body: ProviderResponse = response
            .json()
            .await
            .map_err(|e| AnomalyError::ExternalService(format!("unparsable response: {}", e)))?;

        info!("Fetched live temperature for {}: {} °C", city, body.main.temp);

        Ok(LiveReading {
            city: city.to_string(),
            temperature: body.main.temp,
            fetched_at: Utc::now(),
        })
    }
}
