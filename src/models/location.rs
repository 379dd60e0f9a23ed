//! Location model for resolved places and the persisted last-location record

use serde::{Deserialize, Serialize};

/// Validity window for an auto-restored last location (1 hour, in millis)
pub const LOCATION_FRESHNESS_MS: i64 = 60 * 60 * 1000;

/// A resolved place with a display name and optional coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Display name (city, region, or raw user query)
    pub name: String,
    /// Country code (ISO 3166-1 alpha-2), empty when unresolved
    #[serde(default)]
    pub country: String,
    /// Latitude in decimal degrees, absent for unresolved free-text queries
    pub lat: Option<f64>,
    /// Longitude in decimal degrees, absent for unresolved free-text queries
    pub lon: Option<f64>,
}

impl Location {
    /// Create a fully resolved location
    #[must_use]
    pub fn new(name: impl Into<String>, country: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    /// Create an unresolved location from a free-text query.
    ///
    /// The provider's own name resolution handles these on fetch-by-name.
    #[must_use]
    pub fn from_query(text: &str) -> Self {
        Self {
            name: text.trim().to_string(),
            country: String::new(),
            lat: None,
            lon: None,
        }
    }

    /// Both coordinates, when present
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// A location needs a resolvable name or a full coordinate pair;
    /// anything else must not be persisted or fetched.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() || self.coordinates().is_some()
    }

    /// Recent-search identity: two entries are the same place when name and
    /// country both match.
    #[must_use]
    pub fn same_place(&self, other: &Location) -> bool {
        self.name == other.name && self.country == other.country
    }

    /// Format coordinates for display, e.g. "46.8182, 8.2275"
    #[must_use]
    pub fn format_coordinates(&self) -> Option<String> {
        self.coordinates()
            .map(|(lat, lon)| format!("{lat:.4}, {lon:.4}"))
    }
}

/// A persisted location plus the moment it was saved.
///
/// Stale records are ignored for auto-restore, never deleted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LastLocationRecord {
    #[serde(flatten)]
    pub location: Location,
    /// Epoch milliseconds at save time
    pub timestamp: i64,
}

impl LastLocationRecord {
    #[must_use]
    pub fn new(location: Location, timestamp: i64) -> Self {
        Self {
            location,
            timestamp,
        }
    }

    /// Fresh only within the 1-hour window ending at `now_ms`
    #[must_use]
    pub fn is_fresh_at(&self, now_ms: i64) -> bool {
        now_ms - self.timestamp < LOCATION_FRESHNESS_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(Location::new("Interlaken", "CH", 46.8182, 8.2275).is_valid());
        assert!(Location::from_query("London").is_valid());

        // Coordinates alone are enough
        let coords_only = Location {
            name: String::new(),
            country: String::new(),
            lat: Some(51.5),
            lon: Some(-0.12),
        };
        assert!(coords_only.is_valid());

        // Neither name nor a full pair is invalid
        let empty = Location {
            name: "  ".to_string(),
            country: String::new(),
            lat: Some(51.5),
            lon: None,
        };
        assert!(!empty.is_valid());
    }

    #[test]
    fn test_from_query_is_unresolved() {
        let location = Location::from_query("  Paris  ");
        assert_eq!(location.name, "Paris");
        assert_eq!(location.country, "");
        assert!(location.coordinates().is_none());
    }

    #[test]
    fn test_same_place_ignores_coordinates() {
        let a = Location::new("London", "GB", 51.5074, -0.1278);
        let mut b = a.clone();
        b.lat = Some(51.51);
        assert!(a.same_place(&b));

        let other_country = Location::new("London", "CA", 42.9849, -81.2453);
        assert!(!a.same_place(&other_country));
    }

    #[test]
    fn test_freshness_window() {
        let now_ms = 1_700_000_000_000;
        let location = Location::new("London", "GB", 51.5074, -0.1278);

        let fifty_nine_min = LastLocationRecord::new(location.clone(), now_ms - 59 * 60 * 1000);
        assert!(fifty_nine_min.is_fresh_at(now_ms));

        let sixty_one_min = LastLocationRecord::new(location, now_ms - 61 * 60 * 1000);
        assert!(!sixty_one_min.is_fresh_at(now_ms));
    }

    #[test]
    fn test_format_coordinates() {
        let location = Location::new("Interlaken", "CH", 46.8182, 8.2275);
        assert_eq!(
            location.format_coordinates().as_deref(),
            Some("46.8182, 8.2275")
        );
        assert!(Location::from_query("Bern").format_coordinates().is_none());
    }
}
