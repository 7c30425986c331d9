//! In-memory capability fakes
//!
//! Recording implementations of [`Chime`], [`NativeNotifier`] and [`Banner`]
//! so poll handlers can be exercised without a browser or sound card.

use crate::notify::{Banner, BannerSlot, Chime, NativeNotifier, Tone};
use parking_lot::Mutex;
use std::time::Duration;

pub use crate::store::MemoryStore;

#[derive(Debug, Default)]
pub struct RecordingChime {
    played: Mutex<Vec<Tone>>,
}

impl RecordingChime {
    pub fn played(&self) -> Vec<Tone> {
        self.played.lock().clone()
    }
}

impl Chime for RecordingChime {
    fn play(&self, tone: Tone) {
        self.played.lock().push(tone);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    granted: bool,
    sent: Mutex<Vec<SentNotification>>,
}

impl RecordingNotifier {
    pub fn new(granted: bool) -> Self {
        Self {
            granted,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().clone()
    }
}

impl NativeNotifier for RecordingNotifier {
    fn permission_granted(&self) -> bool {
        self.granted
    }

    fn notify(&self, title: &str, body: &str) {
        self.sent.lock().push(SentNotification {
            title: title.to_string(),
            body: body.to_string(),
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownBanner {
    pub slot: BannerSlot,
    pub text: String,
    pub autohide: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct RecordingBanner {
    shown: Mutex<Vec<ShownBanner>>,
    hidden: Mutex<Vec<BannerSlot>>,
}

impl RecordingBanner {
    pub fn shown(&self) -> Vec<ShownBanner> {
        self.shown.lock().clone()
    }

    pub fn hidden(&self) -> Vec<BannerSlot> {
        self.hidden.lock().clone()
    }

    /// Banners shown in one slot
    pub fn shown_in(&self, slot: BannerSlot) -> Vec<ShownBanner> {
        self.shown
            .lock()
            .iter()
            .filter(|banner| banner.slot == slot)
            .cloned()
            .collect()
    }
}

impl Banner for RecordingBanner {
    fn show(&self, slot: BannerSlot, text: &str, autohide: Option<Duration>) {
        self.shown.lock().push(ShownBanner {
            slot,
            text: text.to_string(),
            autohide,
        });
    }

    fn hide(&self, slot: BannerSlot) {
        self.hidden.lock().push(slot);
    }
}
