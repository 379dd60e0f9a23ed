//! Current-conditions model and the weather-condition code table

use crate::units::capitalize_words;
use serde::{Deserialize, Serialize};

/// Immutable snapshot of current conditions, tied to one fetch.
///
/// All measurements are metric as delivered by the provider; user-facing unit
/// toggling is a presentation conversion, never a different fetch.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Observation timestamp (epoch seconds)
    pub observed_at: i64,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Perceived temperature in Celsius
    pub feels_like: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: f64,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Wind direction in degrees (0-360, 0 is North)
    pub wind_deg: f64,
    /// Visibility in meters, absent when the provider omits it
    pub visibility: Option<f64>,
    /// Sunrise time (epoch seconds)
    pub sunrise: Option<i64>,
    /// Sunset time (epoch seconds)
    pub sunset: Option<i64>,
    /// Provider weather-condition code
    pub condition: u16,
    /// Provider free-text description
    pub description: String,
    /// Provider icon id
    pub icon: Option<String>,
}

/// Icon and display description for a weather-condition code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionInfo {
    pub icon: &'static str,
    pub description: String,
}

/// Look up a condition code in the static table.
///
/// Unknown codes never fail: they fall back to a generic icon and a
/// title-cased rendering of the provider's own description.
#[must_use]
pub fn condition_info(code: u16, provider_description: &str) -> ConditionInfo {
    match condition_table(code) {
        Some((icon, description)) => ConditionInfo {
            icon,
            description: description.to_string(),
        },
        None => ConditionInfo {
            icon: "🌍",
            description: capitalize_words(provider_description),
        },
    }
}

fn condition_table(code: u16) -> Option<(&'static str, &'static str)> {
    let entry = match code {
        // Thunderstorm
        200 => ("⛈️", "Thunderstorm with light rain"),
        201 => ("⛈️", "Thunderstorm with rain"),
        202 => ("⛈️", "Thunderstorm with heavy rain"),
        210 => ("🌩️", "Light thunderstorm"),
        211 => ("⛈️", "Thunderstorm"),
        212 => ("⛈️", "Heavy thunderstorm"),
        221 => ("⛈️", "Ragged thunderstorm"),
        230 => ("⛈️", "Thunderstorm with light drizzle"),
        231 => ("⛈️", "Thunderstorm with drizzle"),
        232 => ("⛈️", "Thunderstorm with heavy drizzle"),

        // Drizzle
        300 => ("🌦️", "Light intensity drizzle"),
        301 => ("🌦️", "Drizzle"),
        302 => ("🌦️", "Heavy intensity drizzle"),
        310 => ("🌦️", "Light intensity drizzle rain"),
        311 => ("🌦️", "Drizzle rain"),
        312 => ("🌦️", "Heavy intensity drizzle rain"),
        313 => ("🌦️", "Shower rain and drizzle"),
        314 => ("🌦️", "Heavy shower rain and drizzle"),
        321 => ("🌦️", "Shower drizzle"),

        // Rain
        500 => ("🌧️", "Light rain"),
        501 => ("🌧️", "Moderate rain"),
        502 => ("🌧️", "Heavy intensity rain"),
        503 => ("🌧️", "Very heavy rain"),
        504 => ("🌧️", "Extreme rain"),
        511 => ("🌧️", "Freezing rain"),
        520 => ("🌦️", "Light intensity shower rain"),
        521 => ("🌦️", "Shower rain"),
        522 => ("🌦️", "Heavy intensity shower rain"),
        531 => ("🌦️", "Ragged shower rain"),

        // Snow
        600 => ("🌨️", "Light snow"),
        601 => ("❄️", "Snow"),
        602 => ("❄️", "Heavy snow"),
        611 => ("🌨️", "Sleet"),
        612 => ("🌨️", "Light shower sleet"),
        613 => ("🌨️", "Shower sleet"),
        615 => ("🌨️", "Light rain and snow"),
        616 => ("🌨️", "Rain and snow"),
        620 => ("🌨️", "Light shower snow"),
        621 => ("❄️", "Shower snow"),
        622 => ("❄️", "Heavy shower snow"),

        // Atmosphere
        701 => ("🌫️", "Mist"),
        711 => ("💨", "Smoke"),
        721 => ("🌫️", "Haze"),
        731 => ("💨", "Sand/dust whirls"),
        741 => ("🌫️", "Fog"),
        751 => ("💨", "Sand"),
        761 => ("💨", "Dust"),
        762 => ("🌋", "Volcanic ash"),
        771 => ("💨", "Squalls"),
        781 => ("🌪️", "Tornado"),

        // Clear
        800 => ("☀️", "Clear sky"),

        // Clouds
        801 => ("🌤️", "Few clouds"),
        802 => ("⛅", "Scattered clouds"),
        803 => ("☁️", "Broken clouds"),
        804 => ("☁️", "Overcast clouds"),

        _ => return None,
    };
    Some(entry)
}
