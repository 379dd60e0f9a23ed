//! Unit conversion and formatting library
//!
//! Pure functions over the metric values the transport layer delivers. The
//! user's unit preference is applied here, at presentation time, never by
//! requesting different units from the provider.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// User-facing measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

#[must_use]
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Format a Celsius temperature in the preferred unit, e.g. "21°C" / "70°F"
#[must_use]
pub fn format_temperature(celsius: f64, unit: Unit) -> String {
    let (value, symbol) = match unit {
        Unit::Celsius => (celsius, "°C"),
        Unit::Fahrenheit => (celsius_to_fahrenheit(celsius), "°F"),
    };
    format!("{:.0}{symbol}", value.round())
}

/// Format a wind speed given in m/s, e.g. "5 m/s" / "11 mph"
#[must_use]
pub fn format_wind_speed(meters_per_second: f64, unit: Unit) -> String {
    match unit {
        Unit::Celsius => format!("{:.0} m/s", meters_per_second.round()),
        Unit::Fahrenheit => {
            let mph = meters_per_second * 2.236_94;
            format!("{:.0} mph", mph.round())
        }
    }
}

/// Compass direction for a wind bearing in degrees (16 sectors, wrapping)
#[must_use]
pub fn format_wind_direction(degrees: f64) -> &'static str {
    let normalized = degrees.rem_euclid(360.0);
    let index = (normalized / 22.5).round() as usize % 16;
    COMPASS[index]
}

/// Format a relative humidity percentage, e.g. "64%"
#[must_use]
pub fn format_humidity(percent: f64) -> String {
    format!("{:.0}%", percent.round())
}

/// Format a pressure given in hPa, e.g. "1013 hPa" / "30 inHg"
#[must_use]
pub fn format_pressure(hpa: f64, unit: Unit) -> String {
    match unit {
        Unit::Celsius => format!("{:.0} hPa", hpa.round()),
        Unit::Fahrenheit => {
            let inhg = hpa * 0.02953;
            format!("{:.0} inHg", inhg.round())
        }
    }
}

/// Format a visibility distance given in meters, e.g. "10 km" / "6 mi"
#[must_use]
pub fn format_visibility(meters: f64, unit: Unit) -> String {
    let km = meters / 1000.0;
    match unit {
        Unit::Celsius => format!("{:.0} km", km.round()),
        Unit::Fahrenheit => {
            let miles = km * 0.621_371;
            format!("{:.0} mi", miles.round())
        }
    }
}

/// Uppercase the first letter of every word, e.g. "light rain" -> "Light Rain"
#[must_use]
pub fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Short weekday name ("Tue") or long ("Tuesday") for an epoch timestamp
#[must_use]
pub fn day_name(epoch_secs: i64, short: bool) -> String {
    match DateTime::from_timestamp(epoch_secs, 0) {
        Some(dt) if short => dt.format("%a").to_string(),
        Some(dt) => dt.format("%A").to_string(),
        None => "--".to_string(),
    }
}

/// 12-hour clock time for an epoch timestamp, e.g. "6:32 AM"
#[must_use]
pub fn format_clock(epoch_secs: i64) -> String {
    match DateTime::from_timestamp(epoch_secs, 0) {
        Some(dt) => dt.format("%l:%M %p").to_string().trim_start().to_string(),
        None => "--".to_string(),
    }
}

/// Relative age of a past moment: "Just now", "5 minutes ago", "3 hours ago",
/// or a short date once it is older than a day.
#[must_use]
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "Just now".to_string();
    }
    if seconds < 3600 {
        return format!("{} minutes ago", seconds / 60);
    }
    if seconds < 86_400 {
        return format!("{} hours ago", seconds / 3600);
    }
    format!("{} {}", then.format("%b"), then.day())
}
