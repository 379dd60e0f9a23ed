//! Skycast - weather dashboard core
//!
//! This library provides the core functionality for locating a place (search,
//! device geolocation, or last-used location), fetching current conditions
//! and a multi-day forecast, aggregating the forecast into daily summaries,
//! and tracking session state with persisted preferences.

pub mod api;
pub mod config;
pub mod debounce;
pub mod error;
pub mod geolocation;
pub mod location_resolver;
pub mod models;
pub mod session;
pub mod store;
pub mod units;

// Re-export core types for public API
pub use api::{WeatherApiClient, WeatherBundle};
pub use config::SkycastConfig;
pub use debounce::Debouncer;
pub use error::SkycastError;
pub use geolocation::{Geolocator, Position, StaticGeolocator, locate};
pub use location_resolver::LocationResolver;
pub use models::{
    CurrentConditions, DailyForecast, ForecastSample, LastLocationRecord, Location,
    aggregate_daily, condition_info,
};
pub use session::{Phase, SessionController, Snapshot};
pub use store::{JsonFileStore, KeyValue, MemoryStore, Store, Theme};
pub use units::Unit;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkycastError>;
