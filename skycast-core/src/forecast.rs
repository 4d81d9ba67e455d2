//! Rolling hourly forecast window.
//!
//! The window starts at the current hour and covers the next few hours of
//! today's series. Hours that fall outside the series are dropped one by one;
//! the window is never padded from the next day.

use chrono::{NaiveDateTime, Timelike};

use crate::model::{ForecastSlot, WeatherSnapshot};

pub const WINDOW_LEN: usize = 6;
pub const NOW_LABEL: &str = "Now";

const HOURS_PER_DAY: usize = 24;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Build the forecast window for `now_hour` (0..=23).
///
/// The first slot always reads "Now" and shows the live temperature instead of
/// the hourly bucket. An out-of-range hour yields an empty window.
pub fn select_window(snapshot: &WeatherSnapshot, now_hour: u32) -> Vec<ForecastSlot> {
    if now_hour as usize >= HOURS_PER_DAY {
        return Vec::new();
    }

    (0..WINDOW_LEN)
        .filter_map(|i| {
            let target = (now_hour as usize + i) % HOURS_PER_DAY;
            let entry = snapshot.today.hour(target)?;

            let slot = if i == 0 {
                ForecastSlot {
                    hour: target as u32,
                    label: NOW_LABEL.to_string(),
                    temperature: format_temperature(snapshot.current.temperature_c),
                }
            } else {
                ForecastSlot {
                    hour: target as u32,
                    label: hour_label(&entry.time, target as u32),
                    temperature: format_temperature(entry.temperature_c),
                }
            };

            Some(slot)
        })
        .collect()
}

/// `21.6 -> "22°"`, `None -> "0°"`.
pub fn format_temperature(celsius: Option<f64>) -> String {
    // `as` saturates and maps NaN to 0, and avoids printing "-0".
    let rounded = celsius.unwrap_or(0.0).round() as i64;
    format!("{rounded}\u{00b0}")
}

/// Two-digit hour of a `"YYYY-MM-DD HH:MM"` timestamp.
fn hour_label(timestamp: &str, fallback_hour: u32) -> String {
    let hour = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
        .map(|dt| dt.hour())
        .unwrap_or_else(|_| {
            tracing::debug!(timestamp, "unparseable hourly timestamp, using index");
            fallback_hour
        });

    format!("{hour:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentConditions, ForecastDay, HourlyEntry};

    fn snapshot_with_hours(count: usize, current: Option<f64>) -> WeatherSnapshot {
        let hours = (0..count)
            .map(|h| HourlyEntry {
                time: format!("2023-11-10 {h:02}:00"),
                temperature_c: Some(h as f64 + 0.4),
            })
            .collect();

        WeatherSnapshot {
            current: CurrentConditions {
                location_name: "Riga".into(),
                region: None,
                country: None,
                local_time: None,
                temperature_c: current,
                condition_text: None,
                condition_icon: None,
            },
            today: ForecastDay::new(hours),
        }
    }

    fn target_hours(slots: &[ForecastSlot]) -> Vec<u32> {
        slots.iter().map(|s| s.hour).collect()
    }

    #[test]
    fn full_day_always_yields_six_slots() {
        let snap = snapshot_with_hours(24, Some(5.0));

        for now in 0..24u32 {
            let slots = select_window(&snap, now);
            assert_eq!(slots.len(), WINDOW_LEN, "now_hour = {now}");

            for (i, slot) in slots.iter().enumerate() {
                assert_eq!(slot.hour, (now + i as u32) % 24);
            }
        }
    }

    #[test]
    fn first_slot_is_now_with_live_temperature() {
        let snap = snapshot_with_hours(24, Some(-3.7));
        let slots = select_window(&snap, 14);

        assert_eq!(slots[0].label, "Now");
        assert_eq!(slots[0].temperature, "-4°");
        // hourly bucket for 14 would have been 14.4
        assert_ne!(slots[0].temperature, "14°");
    }

    #[test]
    fn later_slots_use_hour_labels_and_hourly_temperatures() {
        let snap = snapshot_with_hours(24, Some(0.0));
        let slots = select_window(&snap, 7);

        let labels: Vec<_> = slots.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["Now", "08", "09", "10", "11", "12"]);
        assert_eq!(slots[1].temperature, "8°");
        assert_eq!(slots[5].temperature, "12°");
    }

    #[test]
    fn window_wraps_past_midnight() {
        let snap = snapshot_with_hours(24, Some(1.0));
        let slots = select_window(&snap, 22);

        assert_eq!(target_hours(&slots), [22, 23, 0, 1, 2, 3]);
        assert_eq!(slots[2].label, "00");
    }

    #[test]
    fn short_day_keeps_only_existing_hours() {
        let snap = snapshot_with_hours(10, Some(1.0));

        let slots = select_window(&snap, 2);
        assert_eq!(target_hours(&slots), [2, 3, 4, 5, 6, 7]);

        // entries stop at index 9
        let slots = select_window(&snap, 8);
        assert_eq!(target_hours(&slots), [8, 9]);
        assert_eq!(slots[0].label, "Now");
    }

    #[test]
    fn short_day_omits_missing_hours_individually() {
        let snap = snapshot_with_hours(10, Some(1.0));
        let slots = select_window(&snap, 20);

        assert_eq!(target_hours(&slots), [0, 1]);
        // slot for "now" is missing, so none of them reads "Now"
        assert_eq!(slots[0].label, "00");
        assert_eq!(slots[1].label, "01");
    }

    #[test]
    fn empty_day_or_bad_hour_yields_empty_window() {
        assert!(select_window(&snapshot_with_hours(0, Some(1.0)), 5).is_empty());
        assert!(select_window(&snapshot_with_hours(24, Some(1.0)), 24).is_empty());
        assert!(select_window(&snapshot_with_hours(24, Some(1.0)), 99).is_empty());
    }

    #[test]
    fn temperature_formatting() {
        assert_eq!(format_temperature(Some(21.6)), "22°");
        assert_eq!(format_temperature(Some(21.4)), "21°");
        assert_eq!(format_temperature(Some(-0.4)), "0°");
        assert_eq!(format_temperature(None), "0°");
    }

    #[test]
    fn malformed_timestamp_falls_back_to_index() {
        let mut snap = snapshot_with_hours(24, Some(1.0));
        let mut hours = snap.today.hours().to_vec();
        hours[4].time = "garbage".into();
        snap.today = ForecastDay::new(hours);

        let slots = select_window(&snap, 3);
        assert_eq!(slots[1].label, "04");
    }
}
