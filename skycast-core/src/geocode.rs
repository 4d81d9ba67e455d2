//! Reverse geocoding: coordinates to a locality name for the weather query.
//! Backed by Nominatim (OpenStreetMap), which needs no API key.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("skycast/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[async_trait]
pub trait LocalityResolver: Send + Sync {
    /// `None` means no weather lookup should be triggered.
    async fn resolve_locality(&self, coords: Coordinates) -> Option<String>;
}

#[derive(Debug, Clone)]
pub struct NominatimResolver {
    base_url: String,
    http: Client,
}

impl NominatimResolver {
    pub fn new(base_url: impl Into<String>) -> reqwest::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { base_url: base_url.into().trim_end_matches('/').to_string(), http })
    }
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
    state: Option<String>,
}

impl NominatimAddress {
    // city > town > village > municipality > county > state
    fn locality(self) -> Option<String> {
        [self.city, self.town, self.village, self.municipality, self.county, self.state]
            .into_iter()
            .flatten()
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty())
    }
}

#[async_trait]
impl LocalityResolver for NominatimResolver {
    async fn resolve_locality(&self, coords: Coordinates) -> Option<String> {
        if !coords.is_valid() {
            tracing::warn!(?coords, "coordinates out of range, skipping reverse geocode");
            return None;
        }

        let url = format!("{}/reverse", self.base_url);
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();

        let response = match self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("format", "json"),
                ("addressdetails", "1"),
                ("zoom", "10"),
            ])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Reverse geocode request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Reverse geocode returned status {}", response.status());
            return None;
        }

        let body: NominatimResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("Reverse geocode parse error: {}", e);
                return None;
            }
        };

        let locality = body.address?.locality()?;
        tracing::info!("Reverse geocoded to: {}", locality);
        Some(locality)
    }
}
