//! Durable key-value storage
//!
//! Best-effort persistence for dedup markers and user preferences. Nothing
//! stored here is authoritative; unreadable entries read as absent and write
//! failures are logged, never returned.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Persisted key names
pub mod keys {
    pub const SOUND_ENABLED: &str = "chefSoundEnabled";
    pub const LUNCH_READY_STATE: &str = "lunchReadyState";
    pub const LUNCH_READY_SEEN_AT: &str = "lunchReadySeenAt";
    pub const RING_SEEN_IDS: &str = "chefRingSeenIds";
    pub const MATE_ORDER_SEEN_IDS: &str = "mateOrderSeenIds";
    pub const PREDICTION_SEEN_DATE: &str = "chefLunchPredictionSeen";
    pub const READY_NOTIFY: &str = "employeeReadyNotify";
    pub const LAST_SEEN_ORDER_ID: &str = "chefLastSeenOrderId";
}

/// String-keyed store, one per browser profile
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

/// JSON file store
///
/// Entries live in memory and the whole map is rewritten on every update.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load(&path);
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn load(path: &Path) -> BTreeMap<String, String> {
        if !path.exists() {
            return BTreeMap::new();
        }
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Store unreadable, starting empty");
                return BTreeMap::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Store malformed, starting empty");
            BTreeMap::new()
        })
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> std::io::Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)
    }

    fn flush(&self, entries: &BTreeMap<String, String>) {
        if let Err(e) = self.write(entries) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist store");
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            self.flush(&entries);
        }
    }
}

/// Boolean preferences stored as `"true"` / `"false"`
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        match self.store.get(key).as_deref() {
            Some("true") => true,
            Some("false") => false,
            _ => default,
        }
    }

    fn set_flag(&self, key: &str, value: bool) {
        self.store.set(key, if value { "true" } else { "false" });
    }

    /// Chime preference, enabled unless turned off
    pub fn sound_enabled(&self) -> bool {
        self.flag(keys::SOUND_ENABLED, true)
    }

    pub fn set_sound_enabled(&self, enabled: bool) {
        self.set_flag(keys::SOUND_ENABLED, enabled);
    }

    /// "Notify me when ready" opt-in, disabled unless turned on
    pub fn ready_notify_enabled(&self) -> bool {
        self.flag(keys::READY_NOTIFY, false)
    }

    pub fn set_ready_notify(&self, enabled: bool) {
        self.set_flag(keys::READY_NOTIFY, enabled);
    }

    /// Chef's cached lunch-ready toggle
    pub fn lunch_ready_cached(&self) -> bool {
        self.flag(keys::LUNCH_READY_STATE, false)
    }

    pub fn set_lunch_ready_cached(&self, ready: bool) {
        self.set_flag(keys::LUNCH_READY_STATE, ready);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("a").is_none());
        store.set("a", "1");
        assert_eq!(store.get("a").as_deref(), Some("1"));
        store.remove("a");
        assert!(store.get("a").is_none());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileStore::open(&path);
        store.set(keys::SOUND_ENABLED, "false");
        assert!(path.exists());

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get(keys::SOUND_ENABLED).as_deref(), Some("false"));
    }

    #[test]
    fn test_file_store_malformed_reads_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path);
        assert!(store.get(keys::SOUND_ENABLED).is_none());
        store.set("k", "v");
        assert_eq!(FileStore::open(&path).get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_preference_defaults() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let prefs = Preferences::new(store.clone());
        assert!(prefs.sound_enabled());
        assert!(!prefs.ready_notify_enabled());

        store.set(keys::SOUND_ENABLED, "garbage");
        assert!(prefs.sound_enabled());

        prefs.set_sound_enabled(false);
        assert!(!prefs.sound_enabled());
        prefs.set_ready_notify(true);
        assert!(prefs.ready_notify_enabled());
    }
}
