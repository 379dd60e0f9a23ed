//! Location resolution
//!
//! Turns user-entered queries or device coordinates into canonical
//! [`Location`]s via geocoding search and reverse lookup.

use crate::WeatherApiClient;
use crate::models::Location;
use tracing::{debug, warn};

/// Queries shorter than this never reach the provider; the guard bounds
/// request volume while the user is still typing.
pub const MIN_QUERY_LEN: usize = 3;

/// Service for resolving location inputs
pub struct LocationResolver;

impl LocationResolver {
    /// Search candidate locations for a typed query.
    ///
    /// Fails silently to an empty list on any transport or provider error:
    /// search-as-you-type must never surface an error state, the UI just
    /// shows no suggestions.
    pub async fn search_by_query(
        api_client: &WeatherApiClient,
        query: &str,
        limit: usize,
    ) -> Vec<Location> {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        match api_client.search_cities(trimmed, limit).await {
            Ok(candidates) => {
                debug!("Found {} candidates for '{}'", candidates.len(), trimmed);
                candidates
            }
            Err(e) => {
                warn!("Location search failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Resolve device coordinates to a named location via reverse geocoding.
    ///
    /// When the lookup yields nothing or fails, the coordinates themselves
    /// become the display name; the weather fetch still proceeds by
    /// coordinates.
    pub async fn resolve_coordinates(
        api_client: &WeatherApiClient,
        lat: f64,
        lon: f64,
    ) -> Location {
        debug!("Resolving coordinates: ({}, {})", lat, lon);

        match api_client.reverse_geocode(lat, lon).await {
            Ok(Some(mut location)) => {
                // Keep the device coordinates, not the geocoder's centroid
                location.lat = Some(lat);
                location.lon = Some(lon);
                location
            }
            Ok(None) => {
                debug!("No reverse geocoding results, using coordinates as name");
                Location::new(format!("{lat:.4}, {lon:.4}"), String::new(), lat, lon)
            }
            Err(e) => {
                debug!("Reverse geocoding failed: {}, using coordinates as name", e);
                Location::new(format!("{lat:.4}, {lon:.4}"), String::new(), lat, lon)
            }
        }
    }

    /// A free-text query the user submitted directly (never selected from
    /// suggestions) stays unresolved; the provider's own name resolution
    /// handles it during fetch-by-name.
    #[must_use]
    pub fn from_free_text(text: &str) -> Location {
        Location::from_query(text)
    }
}
