//! Weather API client for OpenWeatherMap integration
//!
//! This module provides HTTP client functionality for retrieving current
//! conditions, forecasts, and geocoding data with per-request timeouts and
//! classified error handling. Current conditions and the forecast are always
//! fetched together, concurrently, and fail as a unit.

use crate::config::ApiConfig;
use crate::models::{CurrentConditions, DailyForecast, ForecastSample, Location, aggregate_daily};
use crate::{Result, SkycastError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Units requested from the provider. Fixed: user-facing unit toggling is a
/// presentation-layer conversion, never a different API call.
const UNITS: &str = "metric";

/// Everything one successful fetch produces: the current-conditions snapshot,
/// the aggregated daily forecast, and the provider-confirmed location.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherBundle {
    pub current: CurrentConditions,
    pub forecast: Vec<DailyForecast>,
    pub location: Location,
}

/// Weather API client for OpenWeatherMap
pub struct WeatherApiClient {
    /// HTTP client
    client: Client,
    /// API configuration
    config: ApiConfig,
}

impl WeatherApiClient {
    /// Create a new weather API client
    pub fn new(config: ApiConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("Skycast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SkycastError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Fetch current conditions and the 5-day forecast for coordinates.
    ///
    /// Both requests run concurrently; either failure fails the whole
    /// operation with no partial result.
    #[instrument(skip(self))]
    pub async fn fetch_by_coordinates(&self, lat: f64, lon: f64) -> Result<WeatherBundle> {
        let key = self.require_key()?;
        info!("Fetching weather for coordinates: {:.4}, {:.4}", lat, lon);
        let started = Instant::now();

        let current_url = format!(
            "{}/weather?lat={lat}&lon={lon}&appid={key}&units={UNITS}&lang={}",
            self.config.base_url, self.config.language
        );
        let forecast_url = format!(
            "{}/forecast?lat={lat}&lon={lon}&appid={key}&units={UNITS}&lang={}",
            self.config.base_url, self.config.language
        );

        let (current, forecast): (owm::CurrentResponse, owm::ForecastResponse) = futures::try_join!(
            self.get_json(&current_url),
            self.get_json(&forecast_url)
        )?;

        info!(
            "Fetched current + {} forecast samples in {:.3}s",
            forecast.list.len(),
            started.elapsed().as_secs_f64()
        );

        // The provider confirms the place name; the caller supplied the coordinates
        let location = Location::new(
            current.name.clone(),
            current.sys.country.clone().unwrap_or_default(),
            lat,
            lon,
        );

        Ok(Self::bundle(current, forecast, location))
    }

    /// Fetch current conditions and the 5-day forecast for a city name,
    /// resolving coordinates from the provider's response.
    #[instrument(skip(self))]
    pub async fn fetch_by_city(&self, name: &str) -> Result<WeatherBundle> {
        let key = self.require_key()?;
        info!("Fetching weather for city: '{}'", name);
        let started = Instant::now();

        let encoded = urlencoding::encode(name);
        let current_url = format!(
            "{}/weather?q={encoded}&appid={key}&units={UNITS}&lang={}",
            self.config.base_url, self.config.language
        );
        let forecast_url = format!(
            "{}/forecast?q={encoded}&appid={key}&units={UNITS}&lang={}",
            self.config.base_url, self.config.language
        );

        let (current, forecast): (owm::CurrentResponse, owm::ForecastResponse) = futures::try_join!(
            self.get_json(&current_url),
            self.get_json(&forecast_url)
        )?;

        info!(
            "Fetched current + {} forecast samples in {:.3}s",
            forecast.list.len(),
            started.elapsed().as_secs_f64()
        );

        let location = Location::new(
            current.name.clone(),
            current.sys.country.clone().unwrap_or_default(),
            current.coord.lat,
            current.coord.lon,
        );

        Ok(Self::bundle(current, forecast, location))
    }

    /// Search candidate locations for a free-text query (geocoding)
    #[instrument(skip(self))]
    pub async fn search_cities(&self, query: &str, limit: usize) -> Result<Vec<Location>> {
        let key = self.require_key()?;
        debug!("Geocoding query: '{}'", query);

        let url = format!(
            "{}/direct?q={}&limit={limit}&appid={key}",
            self.config.geo_url,
            urlencoding::encode(query)
        );

        let results: Vec<owm::GeoResult> = self.get_json(&url).await?;
        if results.is_empty() {
            warn!("No geocoding results for '{}'", query);
        }
        Ok(results.into_iter().map(Location::from).collect())
    }

    /// Reverse geocode coordinates to the nearest known place
    #[instrument(skip(self))]
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Option<Location>> {
        let key = self.require_key()?;
        debug!("Reverse geocoding: {:.4}, {:.4}", lat, lon);

        let url = format!(
            "{}/reverse?lat={lat}&lon={lon}&limit=1&appid={key}",
            self.config.geo_url
        );

        let results: Vec<owm::GeoResult> = self.get_json(&url).await?;
        Ok(results.into_iter().next().map(Location::from))
    }

    fn bundle(
        current: owm::CurrentResponse,
        forecast: owm::ForecastResponse,
        location: Location,
    ) -> WeatherBundle {
        let samples: Vec<ForecastSample> =
            forecast.list.into_iter().map(ForecastSample::from).collect();
        WeatherBundle {
            current: current.into(),
            forecast: aggregate_daily(&samples),
            location,
        }
    }

    /// The single required secret; absence is a configuration error, not a
    /// network failure, and is detected before any request leaves.
    fn require_key(&self) -> Result<&str> {
        match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(SkycastError::config("weather API key is missing")),
        }
    }

    /// Issue one GET and decode the JSON body, classifying every failure
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(&e))?;

        let status = response.status();
        debug!("HTTP response: {}", status);

        if status.as_u16() == 404 {
            warn!("Location not found (HTTP 404)");
            return Err(SkycastError::LocationNotFound);
        }
        if status.as_u16() == 401 {
            return Err(SkycastError::config(
                "provider rejected the API key (HTTP 401)",
            ));
        }
        if !status.is_success() {
            return Err(SkycastError::provider(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error"),
            ));
        }

        response.json().await.map_err(|e| {
            if e.is_timeout() {
                SkycastError::RequestTimeout {
                    seconds: self.config.timeout_seconds,
                }
            } else {
                SkycastError::provider(status.as_u16(), format!("invalid response payload: {e}"))
            }
        })
    }

    fn classify_transport_error(&self, error: &reqwest::Error) -> SkycastError {
        if error.is_timeout() {
            SkycastError::RequestTimeout {
                seconds: self.config.timeout_seconds,
            }
        } else {
            SkycastError::network(error.to_string())
        }
    }
}

/// OpenWeatherMap API response structures and conversion utilities
mod owm {
    use super::{CurrentConditions, ForecastSample, Location};
    use serde::Deserialize;

    /// Current-conditions response from the `/weather` endpoint
    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub coord: Coord,
        #[serde(default)]
        pub weather: Vec<ConditionDesc>,
        pub main: MainData,
        #[serde(default)]
        pub wind: Wind,
        pub visibility: Option<f64>,
        #[serde(default)]
        pub sys: Sys,
        #[serde(default)]
        pub name: String,
        pub dt: i64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Coord {
        pub lat: f64,
        pub lon: f64,
    }

    #[derive(Debug, Deserialize, Clone)]
    pub struct ConditionDesc {
        pub id: u16,
        pub description: String,
        pub icon: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainData {
        pub temp: f64,
        #[serde(default)]
        pub feels_like: f64,
        #[serde(default)]
        pub humidity: f64,
        #[serde(default)]
        pub pressure: f64,
    }

    #[derive(Debug, Deserialize, Default)]
    pub struct Wind {
        #[serde(default)]
        pub speed: f64,
        #[serde(default)]
        pub deg: f64,
    }

    #[derive(Debug, Deserialize, Default)]
    pub struct Sys {
        pub country: Option<String>,
        pub sunrise: Option<i64>,
        pub sunset: Option<i64>,
    }

    /// 3-hourly forecast response from the `/forecast` endpoint
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        #[serde(default)]
        pub list: Vec<ForecastItem>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastItem {
        pub dt: i64,
        pub main: ForecastMain,
        #[serde(default)]
        pub weather: Vec<ConditionDesc>,
        #[serde(default)]
        pub wind: Wind,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastMain {
        pub temp: f64,
        #[serde(default)]
        pub humidity: f64,
    }

    /// Geocoding result from the `/geo/1.0` endpoints
    #[derive(Debug, Deserialize, Clone)]
    pub struct GeoResult {
        pub name: String,
        pub lat: f64,
        pub lon: f64,
        #[serde(default)]
        pub country: String,
        pub state: Option<String>,
    }

    impl From<CurrentResponse> for CurrentConditions {
        fn from(response: CurrentResponse) -> Self {
            let condition = response.weather.first().cloned();
            CurrentConditions {
                observed_at: response.dt,
                temperature: response.main.temp,
                feels_like: response.main.feels_like,
                humidity: response.main.humidity,
                pressure: response.main.pressure,
                wind_speed: response.wind.speed,
                wind_deg: response.wind.deg,
                visibility: response.visibility,
                sunrise: response.sys.sunrise,
                sunset: response.sys.sunset,
                condition: condition.as_ref().map_or(0, |c| c.id),
                description: condition
                    .as_ref()
                    .map_or_else(String::new, |c| c.description.clone()),
                icon: condition.and_then(|c| c.icon),
            }
        }
    }

    impl From<ForecastItem> for ForecastSample {
        fn from(item: ForecastItem) -> Self {
            let condition = item.weather.first().cloned();
            ForecastSample {
                timestamp: item.dt,
                temperature: item.main.temp,
                humidity: item.main.humidity,
                wind_speed: item.wind.speed,
                condition: condition.as_ref().map_or(0, |c| c.id),
                description: condition.map_or_else(String::new, |c| c.description),
            }
        }
    }

    impl From<GeoResult> for Location {
        fn from(geocoding: GeoResult) -> Self {
            let name = if let Some(state) = geocoding.state {
                format!("{}, {}", geocoding.name, state)
            } else {
                geocoding.name
            };

            Location::new(name, geocoding.country, geocoding.lat, geocoding.lon)
        }
    }
}
