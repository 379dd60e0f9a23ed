//! Data models for the Skycast application
//!
//! This module contains the core domain models organized by concern:
//! - Location: resolved places and the persisted last-location record
//! - Weather: current-conditions snapshot and the condition-code table
//! - Forecast: raw samples, daily summaries, and the aggregation reducer

pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{DailyForecast, DailySummary, ForecastSample, MAX_FORECAST_DAYS, aggregate_daily};
pub use location::{LastLocationRecord, LOCATION_FRESHNESS_MS, Location};
pub use weather::{ConditionInfo, CurrentConditions, condition_info};
