//! Status and prep-progress projection for the employee status card

use chrono::{DateTime, Utc};
use shared::{Order, OrderStatus};

const MS_PER_MINUTE: i64 = 60_000;

pub const PREP_TIME_REACHED: &str = "Prep time reached. Waiting for chef to mark ready.";

/// Human-readable line under the status badge
pub fn status_message(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Chef has received your order.",
        OrderStatus::Preparing => "Chef is preparing your order.",
        OrderStatus::Ready => "Order is ready for pickup/delivery.",
        OrderStatus::Delivered => "Order delivered. Enjoy your meal!",
        OrderStatus::Cancelled => "Status updated.",
    }
}

/// Remaining prep estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    /// Whole minutes left, rounded up
    Minutes(i64),
    /// Declared duration has elapsed but the chef has not marked it ready
    PrepTimeReached,
}

/// Visible progress bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressView {
    /// 0..=100
    pub percent: f64,
    pub remaining: Option<Remaining>,
}

impl ProgressView {
    pub fn remaining_text(&self) -> Option<String> {
        self.remaining.map(|remaining| match remaining {
            Remaining::Minutes(minutes) => format!("{minutes} min remaining (est)."),
            Remaining::PrepTimeReached => PREP_TIME_REACHED.to_string(),
        })
    }
}

/// Everything the status card renders for one order
#[derive(Debug, Clone, PartialEq)]
pub struct StatusProjection {
    pub status: OrderStatus,
    pub label: &'static str,
    pub message: &'static str,
    /// `None` hides the progress bar entirely
    pub progress: Option<ProgressView>,
}

impl StatusProjection {
    pub fn percent(&self) -> Option<f64> {
        self.progress.map(|p| p.percent)
    }

    pub fn remaining_text(&self) -> Option<String> {
        self.progress.and_then(|p| p.remaining_text())
    }
}

/// Project an order onto its status card at `now`.
pub fn project(order: &Order, now: DateTime<Utc>) -> StatusProjection {
    let status = order.status;
    let progress = match status {
        OrderStatus::Preparing => prep_progress(order, now),
        OrderStatus::Ready | OrderStatus::Delivered => Some(ProgressView {
            percent: 100.0,
            remaining: None,
        }),
        OrderStatus::Pending | OrderStatus::Cancelled => None,
    };

    StatusProjection {
        status,
        label: status.as_str(),
        message: status_message(status),
        progress,
    }
}

/// Timer math for a preparing order; `None` without a start time and a
/// positive duration.
fn prep_progress(order: &Order, now: DateTime<Utc>) -> Option<ProgressView> {
    let started = order.prep_started()?;
    let total_ms = order.prep_duration()?.num_milliseconds();
    if total_ms <= 0 {
        return None;
    }

    let elapsed_ms = (now - started).num_milliseconds();
    let percent = (elapsed_ms as f64 / total_ms as f64 * 100.0).clamp(0.0, 100.0);
    let remaining_ms = total_ms.saturating_sub(elapsed_ms).max(0);

    let remaining = if remaining_ms == 0 {
        Remaining::PrepTimeReached
    } else {
        Remaining::Minutes((remaining_ms + MS_PER_MINUTE - 1) / MS_PER_MINUTE)
    };

    Some(ProgressView {
        percent,
        remaining: Some(remaining),
    })
}
