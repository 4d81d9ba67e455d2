use std::fmt::Write;

use skycast_core::{ForecastSlot, WeatherSnapshot, format_temperature, normalize_icon_url};

const COLUMN_WIDTH: usize = 6;

/// Heading block: place, temperature, condition and icon URL.
pub fn render_current(snapshot: &WeatherSnapshot) -> String {
    let current = &snapshot.current;
    let mut out = String::new();

    let place = match &current.country {
        Some(country) if country != &current.location_name => {
            format!("{}, {}", current.location_name, country)
        }
        _ => current.location_name.clone(),
    };
    let _ = writeln!(out, "{place}");

    let temp = format_temperature(current.temperature_c);
    match &current.condition_text {
        Some(text) => {
            let _ = writeln!(out, "  {temp}  {text}");
        }
        None => {
            let _ = writeln!(out, "  {temp}");
        }
    }

    if let Some(icon) = &current.condition_icon {
        let _ = writeln!(out, "  icon: {}", normalize_icon_url(icon));
    }

    out
}

/// Two aligned rows: hour labels above temperatures.
pub fn render_window(slots: &[ForecastSlot]) -> String {
    if slots.is_empty() {
        return "  (no hourly forecast available)\n".to_string();
    }

    let mut labels = String::from(" ");
    let mut temps = String::from(" ");
    for slot in slots {
        let _ = write!(labels, "{:>COLUMN_WIDTH$}", slot.label);
        let _ = write!(temps, "{:>COLUMN_WIDTH$}", slot.temperature);
    }

    format!("{}\n{}\n", labels.trim_end(), temps.trim_end())
}
