//! Shared fixtures for the wiremock-driven integration tests

use serde_json::{Value, json};
use skycast::config::ApiConfig;
use wiremock::MockServer;

/// 2023-11-15 00:00:00 UTC; forecast samples are laid out from here so
/// calendar days split cleanly.
pub const FORECAST_BASE: i64 = 1_700_006_400;

pub fn test_api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        api_key: Some("test_api_key_123".to_string()),
        base_url: format!("{}/data/2.5", server.uri()),
        geo_url: format!("{}/geo/1.0", server.uri()),
        language: "en".to_string(),
        timeout_seconds: 1,
    }
}

/// A `/weather` payload for a named place
pub fn current_payload(name: &str, country: &str, lat: f64, lon: f64, temp: f64) -> Value {
    json!({
        "coord": {"lat": lat, "lon": lon},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "main": {"temp": temp, "feels_like": temp - 1.0, "pressure": 1011, "humidity": 72},
        "visibility": 10000,
        "wind": {"speed": 5.1, "deg": 240},
        "sys": {"country": country, "sunrise": FORECAST_BASE + 7 * 3600, "sunset": FORECAST_BASE + 16 * 3600},
        "dt": FORECAST_BASE + 12 * 3600,
        "name": name
    })
}

/// A `/forecast` payload spanning `days` calendar days, 8 samples per day
pub fn forecast_payload(days: usize) -> Value {
    let list: Vec<Value> = (0..days)
        .flat_map(|day| {
            (0..8).map(move |slot| {
                let dt = FORECAST_BASE + (day as i64) * 86_400 + (slot as i64) * 3 * 3600;
                json!({
                    "dt": dt,
                    "main": {"temp": 10.0 + day as f64, "humidity": 70},
                    "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
                    "wind": {"speed": 3.0, "deg": 200}
                })
            })
        })
        .collect();
    json!({"list": list})
}
