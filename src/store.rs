//! Key-value persistence for session state and preferences
//!
//! The durable state is a flat string-keyed JSON blob: recent searches, the
//! preferred unit, the theme, and the last-known location. Every backend
//! tolerates being unavailable by degrading to defaults; persistence failures
//! are logged and never surfaced to callers.

use crate::models::{LastLocationRecord, Location};
use crate::units::Unit;
use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage keys
pub mod keys {
    pub const RECENT_SEARCHES: &str = "skycast_recent_searches";
    pub const PREFERRED_UNIT: &str = "skycast_preferred_unit";
    pub const THEME: &str = "skycast_theme";
    pub const LAST_LOCATION: &str = "skycast_last_location";
}

/// Cap on the recent-search list
pub const MAX_RECENT_SEARCHES: usize = 5;

/// UI theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Minimal string-keyed blob store.
///
/// Implementations never raise: a failed read is a miss, a failed write
/// returns `false`. That keeps private-browsing/quota-style unavailability
/// invisible to the rest of the application.
pub trait KeyValue: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str) -> bool;
}

/// Volatile in-memory backend: the degraded mode when no durable store is
/// available, and the default for tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValue for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries.lock().insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.entries.lock().remove(key).is_some()
    }
}

/// Durable backend: one JSON object file.
///
/// Each operation reads and rewrites the file; there is a single logical
/// writer, so no locking beyond the filesystem is needed. Any I/O or parse
/// problem is logged and reported as a miss.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The platform-default store location
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("skycast").join("store.json"))
    }

    fn load(&self) -> HashMap<String, serde_json::Value> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(e) => {
                    warn!("Ignoring unreadable store file {:?}: {}", self.path, e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!("Failed to read store file {:?}: {}", self.path, e);
                HashMap::new()
            }
        }
    }

    fn save(&self, map: &HashMap<String, serde_json::Value>) -> bool {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("Failed to create store directory {:?}: {}", parent, e);
                return false;
            }
        }
        let contents = match serde_json::to_string_pretty(map) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to serialize store contents: {}", e);
                return false;
            }
        };
        match std::fs::write(&self.path, contents) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to write store file {:?}: {}", self.path, e);
                false
            }
        }
    }
}

impl KeyValue for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().get(key).map(ToString::to_string)
    }

    fn set(&self, key: &str, value: &str) -> bool {
        let parsed: serde_json::Value = match serde_json::from_str(value) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Refusing to store non-JSON value for '{}': {}", key, e);
                return false;
            }
        };
        let mut map = self.load();
        map.insert(key.to_string(), parsed);
        self.save(&map)
    }

    fn remove(&self, key: &str) -> bool {
        let mut map = self.load();
        if map.remove(key).is_none() {
            return false;
        }
        self.save(&map)
    }
}

/// Typed accessors over a [`KeyValue`] backend.
///
/// The single writer for recent searches, preferences, and the last-location
/// record.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KeyValue>,
}

impl Store {
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValue>) -> Self {
        Self { backend }
    }

    /// A store that forgets everything on exit
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.backend.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring malformed value for '{}': {}", key, e);
                None
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(raw) => self.backend.set(key, &raw),
            Err(e) => {
                warn!("Failed to serialize value for '{}': {}", key, e);
                false
            }
        }
    }

    /// Recent searches, most-recent-first
    #[must_use]
    pub fn recent_searches(&self) -> Vec<Location> {
        self.read(keys::RECENT_SEARCHES).unwrap_or_default()
    }

    /// Add a search to the recent list: deduplicate by `(name, country)`,
    /// move to front, cap at [`MAX_RECENT_SEARCHES`]. Invalid locations are
    /// never persisted.
    pub fn add_recent_search(&self, location: &Location) {
        if !location.is_valid() {
            debug!("Skipping invalid location for recent searches");
            return;
        }

        let mut searches = self.recent_searches();
        searches.retain(|existing| !existing.same_place(location));
        searches.insert(0, location.clone());
        searches.truncate(MAX_RECENT_SEARCHES);
        self.write(keys::RECENT_SEARCHES, &searches);
    }

    pub fn clear_recent_searches(&self) {
        self.backend.remove(keys::RECENT_SEARCHES);
    }

    #[must_use]
    pub fn preferred_unit(&self) -> Unit {
        self.read(keys::PREFERRED_UNIT).unwrap_or_default()
    }

    pub fn set_preferred_unit(&self, unit: Unit) -> bool {
        self.write(keys::PREFERRED_UNIT, &unit)
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.read(keys::THEME).unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> bool {
        self.write(keys::THEME, &theme)
    }

    /// The raw last-location record, fresh or not
    #[must_use]
    pub fn last_location(&self) -> Option<LastLocationRecord> {
        self.read(keys::LAST_LOCATION)
    }

    /// Save the last-known location, stamped now
    pub fn set_last_location(&self, location: &Location) {
        if !location.is_valid() {
            debug!("Skipping invalid location for last-location record");
            return;
        }
        let record = LastLocationRecord::new(location.clone(), Utc::now().timestamp_millis());
        self.write(keys::LAST_LOCATION, &record);
    }

    /// The last location only when saved within the freshness window;
    /// stale records are ignored, not deleted.
    #[must_use]
    pub fn fresh_last_location(&self) -> Option<Location> {
        let record = self.last_location()?;
        if record.is_fresh_at(Utc::now().timestamp_millis()) {
            Some(record.location)
        } else {
            debug!("Last location is stale, ignoring for restore");
            None
        }
    }
}
