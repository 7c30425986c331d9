//! Notification dispatch
//!
//! Capability interfaces for the side effects of a poll (banner, native
//! notification, audio chime) and the [`Dispatcher`] that decides which of
//! them a deduplicated event triggers.

use crate::store::{KeyValueStore, Preferences};
use shared::{Order, RingEvent};
use std::sync::Arc;
use std::time::Duration;

pub const NEW_ORDER_AUTOHIDE: Duration = Duration::from_secs(4);
pub const RING_AUTOHIDE: Duration = Duration::from_secs(5);
pub const MATE_ORDER_AUTOHIDE: Duration = Duration::from_secs(5);

// ============================================================================
// Capabilities
// ============================================================================

/// Synthesized cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Short 880 Hz blip
    Chime,
    /// 650/480 Hz warble
    RingTone,
}

impl Tone {
    /// Frequencies in Hz, alternated every [`Tone::step`]
    pub fn frequencies(&self) -> &'static [f32] {
        match self {
            Tone::Chime => &[880.0],
            Tone::RingTone => &[650.0, 480.0],
        }
    }

    pub fn step(&self) -> Option<Duration> {
        match self {
            Tone::Chime => None,
            Tone::RingTone => Some(Duration::from_millis(350)),
        }
    }

    /// Playback length; the audio resource is released afterwards
    pub fn duration(&self) -> Duration {
        match self {
            Tone::Chime => Duration::from_millis(150),
            Tone::RingTone => Duration::from_millis(4500),
        }
    }

    pub fn gain(&self) -> f32 {
        0.08
    }
}

/// Audio output. Implementations swallow playback failures.
pub trait Chime: Send + Sync {
    fn play(&self, tone: Tone);
}

/// OS-level notifications
pub trait NativeNotifier: Send + Sync {
    fn permission_granted(&self) -> bool;
    fn notify(&self, title: &str, body: &str);
}

/// Banner areas on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BannerSlot {
    NewOrder,
    Ring,
    LunchReady,
    MateOrder,
    Prediction,
}

/// In-page banners
pub trait Banner: Send + Sync {
    fn show(&self, slot: BannerSlot, text: &str, autohide: Option<Duration>);
    fn hide(&self, slot: BannerSlot);
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Side-effect policy for deduplicated events.
///
/// Callers decide *whether* an event is new (see [`crate::tracker`]); the
/// dispatcher decides *which* effects fire.
#[derive(Clone)]
pub struct Dispatcher {
    prefs: Preferences,
    chime: Arc<dyn Chime>,
    notifier: Arc<dyn NativeNotifier>,
    banner: Arc<dyn Banner>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        chime: Arc<dyn Chime>,
        notifier: Arc<dyn NativeNotifier>,
        banner: Arc<dyn Banner>,
    ) -> Self {
        Self {
            prefs: Preferences::new(store),
            chime,
            notifier,
            banner,
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn permission_granted(&self) -> bool {
        self.notifier.permission_granted()
    }

    fn chime_if_enabled(&self, tone: Tone) {
        if self.prefs.sound_enabled() {
            self.chime.play(tone);
        }
    }

    /// Chef board: an order above the watermark arrived.
    pub fn new_order(&self) {
        tracing::info!("New order arrived");
        self.banner
            .show(BannerSlot::NewOrder, "New order received.", Some(NEW_ORDER_AUTOHIDE));
        self.chime_if_enabled(Tone::Chime);
    }

    /// Chef board: an unseen ring arrived.
    pub fn ring(&self, ring: &RingEvent) {
        let text = if ring.is_cancellation() {
            format!("{} cancelled their order.", ring.caller())
        } else {
            format!("{} is calling you.", ring.caller())
        };
        tracing::info!(ring_id = ?ring.id, "{text}");
        self.banner.show(BannerSlot::Ring, &text, Some(RING_AUTOHIDE));
        self.chime_if_enabled(Tone::RingTone);
    }

    /// Employee: an unseen mate order arrived.
    pub fn mate_order(&self, order: &Order) {
        let who = match order.employee_name.trim() {
            "" => "Someone",
            name => name,
        };
        let text = format!("{who} ordered for you.");
        tracing::info!(order_id = ?order.id, "{text}");
        self.banner.show(BannerSlot::MateOrder, &text, Some(MATE_ORDER_AUTOHIDE));
        self.chime_if_enabled(Tone::Chime);
    }

    /// Employee: the tracked order just turned Ready.
    ///
    /// Needs the opt-in flag; the native notification additionally needs the
    /// permission grant. Returns whether anything fired.
    pub fn order_ready(&self) -> bool {
        if !self.prefs.ready_notify_enabled() {
            return false;
        }
        if self.notifier.permission_granted() {
            self.notifier
                .notify("Lunch is ready", "Your order is ready for pickup/delivery.");
        }
        self.chime.play(Tone::Chime);
        true
    }

    /// Employee: lunch is ready. `first_time` also alerts; otherwise the
    /// banner alone is re-shown.
    pub fn lunch_ready(&self, first_time: bool) {
        self.banner.show(BannerSlot::LunchReady, "Lunch is ready.", None);
        if !first_time {
            return;
        }
        tracing::info!("Lunch is ready");
        if self.notifier.permission_granted() {
            self.notifier.notify("Lunch is ready", "Lunch is ready.");
        }
        self.chime.play(Tone::Chime);
    }

    /// Chef board: headcount prediction text; `first_time` chimes.
    pub fn prediction(&self, text: &str, first_time: bool) {
        self.banner.show(BannerSlot::Prediction, text, None);
        if first_time {
            self.chime_if_enabled(Tone::Chime);
        }
    }

    /// Sound toggle switched; turning it on plays a sample.
    pub fn set_sound_enabled(&self, enabled: bool) {
        self.prefs.set_sound_enabled(enabled);
        if enabled {
            self.chime.play(Tone::Chime);
        }
    }

    pub fn hide(&self, slot: BannerSlot) {
        self.banner.hide(slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, keys};
    use crate::testing::{RecordingBanner, RecordingChime, RecordingNotifier};

    struct Harness {
        store: Arc<MemoryStore>,
        chime: Arc<RecordingChime>,
        notifier: Arc<RecordingNotifier>,
        banner: Arc<RecordingBanner>,
        dispatcher: Dispatcher,
    }

    fn harness(granted: bool) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let chime = Arc::new(RecordingChime::default());
        let notifier = Arc::new(RecordingNotifier::new(granted));
        let banner = Arc::new(RecordingBanner::default());
        let dispatcher = Dispatcher::new(store.clone(), chime.clone(), notifier.clone(), banner.clone());
        Harness {
            store,
            chime,
            notifier,
            banner,
            dispatcher,
        }
    }

    #[test]
    fn test_new_order_respects_sound_preference() {
        let h = harness(false);
        h.dispatcher.new_order();
        assert_eq!(h.chime.played(), vec![Tone::Chime]);
        let shown = h.banner.shown();
        assert_eq!(shown[0].slot, BannerSlot::NewOrder);
        assert_eq!(shown[0].autohide, Some(NEW_ORDER_AUTOHIDE));

        h.store.set(keys::SOUND_ENABLED, "false");
        h.dispatcher.new_order();
        assert_eq!(h.chime.played().len(), 1);
        assert_eq!(h.banner.shown().len(), 2);
    }

    #[test]
    fn test_ring_text_branches_on_message() {
        let h = harness(false);
        h.dispatcher.ring(&RingEvent {
            id: Some(1),
            employee_name: Some("Kiran".into()),
            message: Some("Order cancelled".into()),
            ..Default::default()
        });
        h.dispatcher.ring(&RingEvent {
            id: Some(2),
            ..Default::default()
        });

        let texts: Vec<String> = h.banner.shown().into_iter().map(|b| b.text).collect();
        assert_eq!(texts, vec!["Kiran cancelled their order.", "Someone is calling you."]);
        assert_eq!(h.chime.played(), vec![Tone::RingTone, Tone::RingTone]);
        assert_eq!(h.banner.shown()[0].autohide, Some(RING_AUTOHIDE));
    }

    #[test]
    fn test_order_ready_needs_opt_in_and_permission() {
        let h = harness(true);
        assert!(!h.dispatcher.order_ready());
        assert!(h.notifier.sent().is_empty());

        h.dispatcher.preferences().set_ready_notify(true);
        assert!(h.dispatcher.order_ready());
        assert_eq!(h.notifier.sent().len(), 1);
        assert_eq!(h.chime.played(), vec![Tone::Chime]);

        let denied = harness(false);
        denied.dispatcher.preferences().set_ready_notify(true);
        assert!(denied.dispatcher.order_ready());
        assert!(denied.notifier.sent().is_empty());
    }

    #[test]
    fn test_lunch_ready_repeat_shows_banner_only() {
        let h = harness(true);
        h.dispatcher.lunch_ready(true);
        h.dispatcher.lunch_ready(false);
        assert_eq!(h.banner.shown().len(), 2);
        assert_eq!(h.notifier.sent().len(), 1);
        assert_eq!(h.chime.played().len(), 1);
    }
}
