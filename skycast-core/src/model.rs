use serde::{Deserialize, Serialize};

/// Free-text location as typed by the user or resolved from coordinates.
///
/// Only emptiness is checked here; the provider decides whether the place exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherQuery(String);

impl WeatherQuery {
    /// Returns `None` when the input is empty or whitespace only.
    pub fn new(input: impl AsRef<str>) -> Option<Self> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub region: Option<String>,
    pub country: Option<String>,
    /// Local time at the location, `"YYYY-MM-DD HH:MM"`.
    pub local_time: Option<String>,
    pub temperature_c: Option<f64>,
    pub condition_text: Option<String>,
    /// Icon reference as sent by the provider, possibly protocol-relative.
    pub condition_icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    /// `"YYYY-MM-DD HH:MM"`
    pub time: String,
    pub temperature_c: Option<f64>,
}

/// Hourly entries of a single day; index `h` is hour-of-day `h`.
///
/// The length is whatever the provider sent. Callers must not assume 24.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    hours: Vec<HourlyEntry>,
}

impl ForecastDay {
    pub fn new(hours: Vec<HourlyEntry>) -> Self {
        Self { hours }
    }

    pub fn hours(&self) -> &[HourlyEntry] {
        &self.hours
    }

    pub fn hour(&self, hour_of_day: usize) -> Option<&HourlyEntry> {
        self.hours.get(hour_of_day)
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }
}

/// One fetched result: current conditions plus today's hourly series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub today: ForecastDay,
}

/// Display-ready cell of the forecast window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSlot {
    /// Hour of day this slot was derived from.
    pub hour: u32,
    pub label: String,
    pub temperature: String,
}
