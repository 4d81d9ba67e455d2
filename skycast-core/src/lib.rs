//! Core library for the `skycast` weather client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com client behind a provider abstraction
//! - The rolling hourly forecast window
//! - Icon and reverse-geocoding capabilities
//! - A session that drives fetches for a UI layer
//!
//! It is used by `skycast-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod icon;
pub mod model;
pub mod provider;
pub mod session;

pub use config::{ApiConfig, Config, GeocodeConfig};
pub use error::{ErrorKind, WeatherError};
pub use forecast::{format_temperature, select_window};
pub use geocode::{Coordinates, LocalityResolver, NominatimResolver};
pub use icon::{HttpImageCache, Image, ImageLookup, ImageResolver, normalize_icon_url};
pub use model::{CurrentConditions, ForecastDay, ForecastSlot, HourlyEntry, WeatherQuery, WeatherSnapshot};
pub use provider::{WeatherProvider, weatherapi::WeatherApiClient};
pub use session::{WeatherEvent, WeatherSession};
