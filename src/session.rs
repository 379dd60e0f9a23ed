//! Session state controller
//!
//! Orchestrates location resolution, weather fetching, and persistence behind
//! a single state machine the presentation layer can render from. The
//! displayed triple (location, current conditions, forecast) is replaced
//! atomically; a failed fetch keeps the previous data visible.

use crate::SkycastError;
use crate::api::{WeatherApiClient, WeatherBundle};
use crate::geolocation::Position;
use crate::location_resolver::LocationResolver;
use crate::models::{CurrentConditions, DailyForecast, Location};
use crate::store::Store;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No location selected yet (welcome/empty state)
    Idle,
    /// A fetch is in flight
    Loading,
    /// The displayed triple is live
    Ready,
    /// The last fetch failed; stale data may still be displayed
    Error,
}

/// Consistent view of the controller state for rendering
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub phase: Phase,
    pub location: Option<Location>,
    pub current: Option<CurrentConditions>,
    pub forecast: Vec<DailyForecast>,
    pub error: Option<SkycastError>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Snapshot {
    fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            location: None,
            current: None,
            forecast: Vec::new(),
            error: None,
            last_updated: None,
        }
    }
}

enum FetchTarget {
    Coordinates(f64, f64),
    City(String),
}

/// Session state controller
pub struct SessionController {
    api: WeatherApiClient,
    store: Store,
    suggestion_limit: usize,
    state: Mutex<Snapshot>,
    /// Monotonic fetch sequence; responses that are no longer the latest
    /// issued are discarded so out-of-order settles never reach the UI.
    seq: AtomicU64,
}

impl SessionController {
    #[must_use]
    pub fn new(api: WeatherApiClient, store: Store, suggestion_limit: usize) -> Self {
        Self {
            api,
            store,
            suggestion_limit,
            state: Mutex::new(Snapshot::idle()),
            seq: AtomicU64::new(0),
        }
    }

    /// Current state, cloned under the lock so the caller never observes a
    /// partially updated triple.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.state.lock().clone()
    }

    /// Restore the last session or fetch a caller-supplied starting location.
    ///
    /// With neither, stay idle: the UI shows a welcome state, not an error.
    pub async fn start(&self, initial: Option<Location>) {
        if let Some(location) = initial {
            self.select(location).await;
            return;
        }

        match self.store.fresh_last_location() {
            Some(location) => {
                info!("Restoring last session location: {}", location.name);
                {
                    let mut state = self.state.lock();
                    state.location = Some(location.clone());
                }
                self.select(location).await;
            }
            None => debug!("No fresh last location; starting idle"),
        }
    }

    /// Fetch weather for a selected or submitted location, dispatching by
    /// coordinates when present and by name otherwise.
    pub async fn select(&self, location: Location) {
        match location.coordinates() {
            Some((lat, lon)) => self.fetch_by_coordinates(lat, lon).await,
            None if !location.name.trim().is_empty() => self.fetch_by_city(&location.name).await,
            None => debug!("Ignoring selection with neither name nor coordinates"),
        }
    }

    pub async fn fetch_by_coordinates(&self, lat: f64, lon: f64) {
        self.run_fetch(FetchTarget::Coordinates(lat, lon)).await;
    }

    pub async fn fetch_by_city(&self, name: &str) {
        self.run_fetch(FetchTarget::City(name.to_string())).await;
    }

    /// Fetch weather for a device position, resolving a display name for the
    /// coordinates first. Reverse-lookup failures fall back to coordinates as
    /// the name; the fetch proceeds either way.
    pub async fn fetch_by_position(&self, position: Position) {
        let location =
            LocationResolver::resolve_coordinates(&self.api, position.latitude, position.longitude)
                .await;
        self.select(location).await;
    }

    /// Re-fetch the displayed location. A no-op without one.
    pub async fn refresh(&self) {
        let location = { self.state.lock().location.clone() };
        match location {
            Some(location) => self.select(location).await,
            None => debug!("Refresh with no current location is a no-op"),
        }
    }

    /// Candidate locations for a typed query; errors are swallowed to an
    /// empty list by the resolver.
    pub async fn search(&self, query: &str) -> Vec<Location> {
        LocationResolver::search_by_query(&self.api, query, self.suggestion_limit).await
    }

    /// Drop the visible error, falling back to the phase the remaining data
    /// supports.
    pub fn clear_error(&self) {
        let mut state = self.state.lock();
        state.error = None;
        if state.phase == Phase::Error {
            state.phase = if state.current.is_some() {
                Phase::Ready
            } else {
                Phase::Idle
            };
        }
    }

    async fn run_fetch(&self, target: FetchTarget) {
        let issued = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.lock();
            state.phase = Phase::Loading;
            state.error = None;
        }

        let result = match &target {
            FetchTarget::Coordinates(lat, lon) => self.api.fetch_by_coordinates(*lat, *lon).await,
            FetchTarget::City(name) => self.api.fetch_by_city(name).await,
        };

        // A newer request supersedes this one; its settle owns the state
        if issued != self.seq.load(Ordering::SeqCst) {
            debug!("Discarding settled response for superseded request #{issued}");
            return;
        }

        match result {
            Ok(bundle) => self.commit(bundle),
            Err(e) => {
                warn!("Fetch failed: {}", e);
                let mut state = self.state.lock();
                state.phase = Phase::Error;
                // Previously displayed data stays visible (stale-but-visible);
                // a first fetch has nothing to preserve
                state.error = Some(e);
            }
        }
    }

    fn commit(&self, bundle: WeatherBundle) {
        let location = bundle.location;
        {
            let mut state = self.state.lock();
            state.location = Some(location.clone());
            state.current = Some(bundle.current);
            state.forecast = bundle.forecast;
            state.phase = Phase::Ready;
            state.error = None;
            state.last_updated = Some(Utc::now());
        }

        // Fire-and-forget: the store logs its own failures and a write
        // failure never fails the fetch
        self.store.set_last_location(&location);
        self.store.add_recent_search(&location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    fn controller() -> SessionController {
        let api = WeatherApiClient::new(ApiConfig::default()).expect("client");
        SessionController::new(api, Store::in_memory(), 5)
    }

    #[test]
    fn test_initial_snapshot_is_idle_and_empty() {
        let controller = controller();
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, Phase::Idle);
        assert!(snapshot.location.is_none());
        assert!(snapshot.current.is_none());
        assert!(snapshot.forecast.is_empty());
        assert!(snapshot.error.is_none());
        assert!(snapshot.last_updated.is_none());
    }

    #[tokio::test]
    async fn test_refresh_without_location_is_noop() {
        let controller = controller();
        controller.refresh().await;
        assert_eq!(controller.snapshot().phase, Phase::Idle);
    }

    #[tokio::test]
    async fn test_first_fetch_failure_has_nothing_to_preserve() {
        // Keyless client: every fetch fails with a configuration error
        let controller = controller();
        controller.fetch_by_city("London").await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, Phase::Error);
        assert!(matches!(
            snapshot.error,
            Some(SkycastError::Configuration { .. })
        ));
        assert!(snapshot.current.is_none());
        assert!(snapshot.forecast.is_empty());
    }

    #[tokio::test]
    async fn test_selecting_invalid_location_does_nothing() {
        let controller = controller();
        let invalid = Location {
            name: "   ".to_string(),
            country: String::new(),
            lat: None,
            lon: None,
        };
        controller.select(invalid).await;
        assert_eq!(controller.snapshot().phase, Phase::Idle);
    }

    #[tokio::test]
    async fn test_clear_error_falls_back_to_idle_without_data() {
        let controller = controller();
        controller.fetch_by_city("London").await;
        assert_eq!(controller.snapshot().phase, Phase::Error);

        controller.clear_error();
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, Phase::Idle);
        assert!(snapshot.error.is_none());
    }
}
