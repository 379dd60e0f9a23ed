//! Forecast models and the daily aggregation reducer
//!
//! The provider delivers a 3-hourly sample sequence; the dashboard shows at
//! most five per-day summaries derived from it. Summaries are computed fresh
//! on every fetch and never mutated afterward.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Maximum number of daily summaries produced by aggregation
pub const MAX_FORECAST_DAYS: usize = 5;

/// One 3-hour-resolution forecast reading, in raw provider (metric) units
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastSample {
    /// Sample timestamp (epoch seconds)
    pub timestamp: i64,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Provider weather-condition code
    pub condition: u16,
    /// Provider free-text description
    pub description: String,
}

/// Aggregated summary over one calendar day's samples
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailySummary {
    /// Lowest sample temperature of the day
    pub temp_min: f64,
    /// Highest sample temperature of the day
    pub temp_max: f64,
    /// Rounded arithmetic mean humidity
    pub humidity: u8,
    /// Arithmetic mean wind speed in m/s
    pub wind_speed: f64,
    /// Dominant condition code (highest sample count, first-seen tie-break)
    pub condition: u16,
    /// Description of the dominant condition
    pub condition_description: String,
}

/// One day of forecast: the raw samples plus their summary
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyForecast {
    /// Calendar-day key (UTC date, `YYYY-MM-DD`)
    pub date_key: String,
    /// Timestamp of the day's first sample (epoch seconds)
    pub timestamp: i64,
    /// The day's samples, in input order (non-empty)
    pub samples: Vec<ForecastSample>,
    pub summary: DailySummary,
}

/// Reduce a 3-hourly sample sequence into at most five daily summaries.
///
/// Samples are partitioned by the UTC calendar day of their timestamp,
/// preserving first-seen day order, then summarized per bucket. The result is
/// sorted by first-sample timestamp; the input is normally chronological
/// already, but ordering must not depend on that. A provider returning fewer
/// than five distinct days yields fewer summaries, never padding.
#[must_use]
pub fn aggregate_daily(samples: &[ForecastSample]) -> Vec<DailyForecast> {
    let mut buckets: Vec<(String, Vec<ForecastSample>)> = Vec::new();

    for sample in samples {
        let key = day_key(sample.timestamp);
        match buckets.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, bucket)) => bucket.push(sample.clone()),
            None => buckets.push((key, vec![sample.clone()])),
        }
    }

    let mut days: Vec<DailyForecast> = buckets
        .into_iter()
        .map(|(date_key, bucket)| summarize_day(date_key, bucket))
        .collect();

    days.sort_by_key(|day| day.timestamp);
    days.truncate(MAX_FORECAST_DAYS);
    days
}

/// UTC calendar-day key for a sample timestamp
#[must_use]
pub fn day_key(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.date_naive().to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn summarize_day(date_key: String, samples: Vec<ForecastSample>) -> DailyForecast {
    // Buckets are non-empty by construction
    let mut temp_min = f64::INFINITY;
    let mut temp_max = f64::NEG_INFINITY;
    let mut humidity_sum = 0.0;
    let mut wind_sum = 0.0;
    // Ordered association list: first-seen order decides ties deterministically
    let mut counts: Vec<(u16, usize)> = Vec::new();

    for sample in &samples {
        temp_min = temp_min.min(sample.temperature);
        temp_max = temp_max.max(sample.temperature);
        humidity_sum += sample.humidity;
        wind_sum += sample.wind_speed;

        match counts.iter_mut().find(|(code, _)| *code == sample.condition) {
            Some((_, count)) => *count += 1,
            None => counts.push((sample.condition, 1)),
        }
    }

    let mut dominant = counts[0];
    for &candidate in &counts[1..] {
        // Strictly greater keeps the first-encountered code on ties
        if candidate.1 > dominant.1 {
            dominant = candidate;
        }
    }

    let condition_description = samples
        .iter()
        .find(|sample| sample.condition == dominant.0)
        .map(|sample| sample.description.clone())
        .unwrap_or_default();

    let count = samples.len() as f64;
    let timestamp = samples[0].timestamp;

    DailyForecast {
        date_key,
        timestamp,
        summary: DailySummary {
            temp_min,
            temp_max,
            humidity: (humidity_sum / count).round() as u8,
            wind_speed: wind_sum / count,
            condition: dominant.0,
            condition_description,
        },
        samples,
    }
}
