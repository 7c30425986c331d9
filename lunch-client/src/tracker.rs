//! Seen-ID tracking
//!
//! Persisted markers that decide whether an event was already acted upon:
//!
//! - [`OrderWatermark`]: highest order id seen; cold start adopts silently
//! - [`SeenIdSet`]: open-ended id set for rings and mate orders
//! - [`SeenMarker`]: last acknowledged string (prediction date, lunch-ready stamp)
//!
//! Each check is a single read-modify-write against the store.

use crate::store::{KeyValueStore, keys};
use std::collections::BTreeSet;
use std::sync::Arc;

/// `isNew` / `markSeen` contract shared by all trackers
pub trait SeenTracker {
    type Id: ?Sized;

    fn is_new(&self, id: &Self::Id) -> bool;
    fn mark_seen(&self, id: &Self::Id);
}

// ============================================================================
// OrderWatermark
// ============================================================================

/// High-watermark over monotonically assigned order ids
#[derive(Clone)]
pub struct OrderWatermark {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
}

impl OrderWatermark {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: keys::LAST_SEEN_ORDER_ID,
        }
    }

    /// Stored maximum; malformed values read as absent
    pub fn last_seen(&self) -> Option<i64> {
        self.store.get(self.key)?.trim().parse().ok()
    }

    /// Feed the ids of one poll. Returns true when a newer order arrived.
    ///
    /// With no stored maximum the newest id is adopted without reporting.
    pub fn observe<I>(&self, ids: I) -> bool
    where
        I: IntoIterator<Item = i64>,
    {
        let Some(newest) = ids.into_iter().max() else {
            return false;
        };
        match self.last_seen() {
            None => {
                tracing::debug!(order_id = newest, "Adopting order watermark");
                self.store.set(self.key, &newest.to_string());
                false
            }
            Some(last) if newest > last => {
                self.store.set(self.key, &newest.to_string());
                true
            }
            Some(_) => false,
        }
    }
}

impl SeenTracker for OrderWatermark {
    type Id = i64;

    fn is_new(&self, id: &i64) -> bool {
        self.last_seen().is_some_and(|last| *id > last)
    }

    fn mark_seen(&self, id: &i64) {
        if self.last_seen().is_none_or(|last| *id > last) {
            self.store.set(self.key, &id.to_string());
        }
    }
}

// ============================================================================
// SeenIdSet
// ============================================================================

/// Growing set of ids persisted as a JSON array
#[derive(Clone)]
pub struct SeenIdSet {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
}

impl SeenIdSet {
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self { store, key }
    }

    pub fn rings(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, keys::RING_SEEN_IDS)
    }

    pub fn mate_orders(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, keys::MATE_ORDER_SEEN_IDS)
    }

    /// Load the set; anything that is not a JSON array reads as empty
    pub fn load(&self) -> BTreeSet<i64> {
        let Some(raw) = self.store.get(self.key) else {
            return BTreeSet::new();
        };
        match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(values) => values.iter().filter_map(|v| v.as_i64()).collect(),
            Err(e) => {
                tracing::debug!(key = self.key, error = %e, "Seen-id set malformed, treating as empty");
                BTreeSet::new()
            }
        }
    }

    fn save(&self, ids: &BTreeSet<i64>) {
        match serde_json::to_string(ids) {
            Ok(raw) => self.store.set(self.key, &raw),
            Err(e) => tracing::warn!(key = self.key, error = %e, "Failed to encode seen-id set"),
        }
    }

    /// Pick the first item whose id is unseen, mark it seen and return it.
    ///
    /// Items without an id are never reported.
    pub fn take_first_unseen<'a, T, F>(&self, items: &'a [T], id_of: F) -> Option<&'a T>
    where
        F: Fn(&T) -> Option<i64>,
    {
        let mut seen = self.load();
        let (item, id) = items
            .iter()
            .find_map(|item| id_of(item).filter(|id| !seen.contains(id)).map(|id| (item, id)))?;
        seen.insert(id);
        self.save(&seen);
        Some(item)
    }
}

impl SeenTracker for SeenIdSet {
    type Id = i64;

    fn is_new(&self, id: &i64) -> bool {
        !self.load().contains(id)
    }

    fn mark_seen(&self, id: &i64) {
        let mut seen = self.load();
        if seen.insert(*id) {
            self.save(&seen);
        }
    }
}

// ============================================================================
// SeenMarker
// ============================================================================

/// Last acknowledged string value
#[derive(Clone)]
pub struct SeenMarker {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
}

impl SeenMarker {
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self { store, key }
    }

    /// Lunch-prediction date marker
    pub fn prediction(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, keys::PREDICTION_SEEN_DATE)
    }

    /// Lunch-ready `updated_at` marker
    pub fn lunch_ready(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, keys::LUNCH_READY_SEEN_AT)
    }

    pub fn last_seen(&self) -> Option<String> {
        self.store.get(self.key)
    }

    /// Store `value` if it differs from the marker; true when it did.
    pub fn acknowledge(&self, value: &str) -> bool {
        if !self.is_new(value) {
            return false;
        }
        self.mark_seen(value);
        true
    }
}

impl SeenTracker for SeenMarker {
    type Id = str;

    fn is_new(&self, id: &str) -> bool {
        self.last_seen().as_deref() != Some(id)
    }

    fn mark_seen(&self, id: &str) {
        self.store.set(self.key, id);
    }
}
