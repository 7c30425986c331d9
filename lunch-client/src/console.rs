//! Log-backed capabilities for headless runs
//!
//! Banners and notifications become `tracing` events; the chime writes a
//! terminal bell. Nothing here can fail the caller.

use crate::notify::{Banner, BannerSlot, Chime, NativeNotifier, Tone};
use std::io::Write;
use std::time::Duration;

/// Terminal bell, optionally muted
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalChime {
    pub muted: bool,
}

impl Chime for TerminalChime {
    fn play(&self, tone: Tone) {
        tracing::debug!(
            ?tone,
            hz = ?tone.frequencies(),
            gain = tone.gain(),
            duration_ms = tone.duration().as_millis() as u64,
            "Chime"
        );
        if self.muted {
            return;
        }
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(b"\x07").and_then(|_| stdout.flush());
    }
}

/// Native notifications rendered as log lines
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier {
    pub granted: bool,
}

impl NativeNotifier for LogNotifier {
    fn permission_granted(&self) -> bool {
        self.granted
    }

    fn notify(&self, title: &str, body: &str) {
        tracing::info!(title, "🔔 {body}");
    }
}

/// Banners rendered as log lines
#[derive(Debug, Clone, Copy, Default)]
pub struct LogBanner;

impl Banner for LogBanner {
    fn show(&self, slot: BannerSlot, text: &str, autohide: Option<Duration>) {
        tracing::info!(
            ?slot,
            autohide_ms = autohide.map(|d| d.as_millis() as u64),
            "{text}"
        );
    }

    fn hide(&self, slot: BannerSlot) {
        tracing::debug!(?slot, "Banner hidden");
    }
}
