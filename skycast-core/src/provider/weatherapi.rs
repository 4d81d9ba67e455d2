use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    config::ApiConfig,
    error::WeatherError,
    model::{CurrentConditions, ForecastDay, HourlyEntry, WeatherQuery, WeatherSnapshot},
    provider::truncate_body,
};

use super::WeatherProvider;

/// WeatherAPI.com forecast client, authenticated with a key/host header pair.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api: ApiConfig,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api: ApiConfig) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .map_err(WeatherError::transport)?;

        Ok(Self { api, http })
    }

    async fn fetch_body(&self, query: &WeatherQuery) -> Result<String, WeatherError> {
        let res = self
            .http
            .get(&self.api.endpoint)
            .header(self.api.key_header.as_str(), self.api.api_key.as_str())
            .header(self.api.host_header.as_str(), self.api.api_host.as_str())
            .query(&[("q", query.as_str())])
            .send()
            .await
            .map_err(WeatherError::transport)?;

        let status = res.status();
        let body = res.text().await.map_err(WeatherError::transport)?;

        if !status.is_success() {
            return Err(WeatherError::FetchFailed {
                status: Some(status),
                message: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

/// Decode a forecast response body.
///
/// Only the location name and today's hour array are required; everything
/// else degrades to `None`.
pub fn parse_forecast(body: &str) -> Result<WeatherSnapshot, WeatherError> {
    let parsed: WaForecastResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::DecodeFailed(e.to_string()))?;

    let today = parsed
        .forecast
        .forecastday
        .into_iter()
        .next()
        .ok_or_else(|| {
            WeatherError::DecodeFailed("response contained no forecastday data".to_string())
        })?;

    let hours = today
        .hour
        .into_iter()
        .map(|h| HourlyEntry { time: h.time, temperature_c: h.temp_c })
        .collect();

    let condition = parsed.current.condition.unwrap_or_default();

    Ok(WeatherSnapshot {
        current: CurrentConditions {
            location_name: parsed.location.name,
            region: parsed.location.region.filter(|s| !s.is_empty()),
            country: parsed.location.country.filter(|s| !s.is_empty()),
            local_time: parsed.location.localtime,
            temperature_c: parsed.current.temp_c,
            condition_text: condition.text,
            condition_icon: condition.icon,
        },
        today: ForecastDay::new(hours),
    })
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    region: Option<String>,
    country: Option<String>,
    localtime: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WaCondition {
    text: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WaCurrent {
    temp_c: Option<f64>,
    condition: Option<WaCondition>,
}

#[derive(Debug, Deserialize)]
struct WaForecastHour {
    time: String,
    temp_c: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    hour: Vec<WaForecastHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    #[serde(default)]
    current: WaCurrent,
    forecast: WaForecast,
}

#[async_trait]
impl WeatherProvider for WeatherApiClient {
    #[tracing::instrument(skip_all, fields(query = %query))]
    async fn fetch_weather(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, WeatherError> {
        let body = self.fetch_body(query).await.inspect_err(|e| {
            tracing::warn!(error = %e, "weather request failed");
        })?;

        let snapshot = parse_forecast(&body).inspect_err(|e| {
            tracing::warn!(error = %e, "weather response did not match expected shape");
        })?;

        tracing::debug!(
            location = %snapshot.current.location_name,
            hours = snapshot.today.len(),
            "weather snapshot decoded"
        );

        Ok(snapshot)
    }
}
