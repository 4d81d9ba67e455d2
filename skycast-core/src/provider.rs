use crate::{Config, WeatherError, WeatherQuery, WeatherSnapshot, provider::weatherapi::WeatherApiClient};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, WeatherError>;
}

/// Construct the WeatherAPI.com client from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api = config.api_config()?;
    let client = WeatherApiClient::new(api.clone())?;
    Ok(Box::new(client))
}

/// Shorten a response body for inclusion in error messages.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
