//! Employee pages
//!
//! Status card of one order, the lunch-ready banner, mate orders and the
//! employee's own order history.

use crate::chef;
use crate::http::LunchApi;
use crate::menu::{self, MenuSection};
use crate::notify::{BannerSlot, Dispatcher};
use crate::progress::{self, StatusProjection};
use crate::store::KeyValueStore;
use crate::tracker::{SeenIdSet, SeenMarker};
use crate::ClientResult;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use shared::{CheckinStatus, LunchReady, Order, OrderStatus, Preset};
use std::sync::Arc;

/// Lunch-ready announcements older than this (milliseconds) are ignored
pub const LUNCH_READY_STALE_AFTER_MS: i64 = 45 * 60_000;

/// Lunch banner after a lunch-ready tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LunchBanner {
    Hidden,
    /// Ready, but announced too long ago
    Stale,
    /// Ready; `alerted` when this tick fired the notification
    Shown { alerted: bool },
}

/// Persisted and in-memory state of the employee pages
pub struct EmployeeState {
    last_status: Mutex<Option<OrderStatus>>,
    lunch_seen: SeenMarker,
    mate_orders: SeenIdSet,
    dispatcher: Arc<Dispatcher>,
}

impl EmployeeState {
    pub fn new(store: Arc<dyn KeyValueStore>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            last_status: Mutex::new(None),
            lunch_seen: SeenMarker::lunch_ready(store.clone()),
            mate_orders: SeenIdSet::mate_orders(store),
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Project the tracked order and notify on a change to Ready.
    ///
    /// The first observed status is adopted silently.
    pub fn handle_order(&self, order: &Order, now: DateTime<Utc>) -> StatusProjection {
        let status = order.status;
        let previous = self.last_status.lock().replace(status);
        if let Some(previous) = previous
            && previous != status
            && status == OrderStatus::Ready
        {
            tracing::info!(order_id = ?order.id, "Order is ready");
            self.dispatcher.order_ready();
        }
        progress::project(order, now)
    }

    /// Lunch-ready banner; alerts once per server `updated_at`.
    pub fn handle_lunch_ready(&self, state: &LunchReady, now: DateTime<Utc>) -> LunchBanner {
        if !state.is_ready {
            self.dispatcher.hide(BannerSlot::LunchReady);
            return LunchBanner::Hidden;
        }
        if let Some(updated) = state.updated()
            && (now - updated).num_milliseconds() > LUNCH_READY_STALE_AFTER_MS
        {
            tracing::debug!(updated_at = %updated, "Ignoring stale lunch-ready");
            self.dispatcher.hide(BannerSlot::LunchReady);
            return LunchBanner::Stale;
        }

        let alerted = match state.updated_at.as_deref() {
            Some(updated_at) if !updated_at.is_empty() => self.lunch_seen.acknowledge(updated_at),
            _ => false,
        };
        self.dispatcher.lunch_ready(alerted);
        LunchBanner::Shown { alerted }
    }

    /// Announce at most one unseen mate order per tick.
    pub fn handle_mate_orders(&self, orders: &[Order]) -> Option<Order> {
        let order = self.mate_orders.take_first_unseen(orders, |o| o.id)?;
        self.dispatcher.mate_order(order);
        Some(order.clone())
    }

    /// Opt in to "ready" notifications; only sticks with permission granted.
    pub fn enable_ready_notifications(&self) -> bool {
        let granted = self.dispatcher.permission_granted();
        self.dispatcher.preferences().set_ready_notify(granted);
        if granted {
            self.dispatcher.order_ready();
        }
        granted
    }
}

/// Own orders, newest first
pub fn sort_my_orders(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| b.id.unwrap_or(0).cmp(&a.id.unwrap_or(0)));
    orders
}

// ============================================================================
// Poll ticks
// ============================================================================

pub async fn poll_order_status<A: LunchApi + ?Sized>(
    api: &A,
    state: &EmployeeState,
    order_id: i64,
) -> ClientResult<StatusProjection> {
    let order = api.order(order_id).await?;
    Ok(state.handle_order(&order, Utc::now()))
}

pub async fn poll_lunch_ready<A: LunchApi + ?Sized>(api: &A, state: &EmployeeState) -> ClientResult<LunchBanner> {
    let lunch = api.lunch_ready().await?;
    Ok(state.handle_lunch_ready(&lunch, Utc::now()))
}

pub async fn poll_mate_orders<A: LunchApi + ?Sized>(api: &A, state: &EmployeeState) -> ClientResult<Option<Order>> {
    let orders = api.mate_orders().await?;
    Ok(state.handle_mate_orders(&orders))
}

pub async fn poll_my_orders<A: LunchApi + ?Sized>(api: &A) -> ClientResult<Vec<Order>> {
    Ok(sort_my_orders(api.my_orders().await?))
}

pub async fn poll_menu<A: LunchApi + ?Sized>(api: &A) -> ClientResult<Vec<MenuSection>> {
    let items = api.menu().await?;
    Ok(menu::group_by_category(&items))
}

pub async fn load_presets<A: LunchApi + ?Sized>(api: &A) -> ClientResult<Vec<Preset>> {
    api.presets().await
}

// ============================================================================
// Actions
// ============================================================================

/// Call the chef over
pub async fn ring<A: LunchApi + ?Sized>(api: &A) -> ClientResult<()> {
    api.ring().await?;
    tracing::info!("Rang the chef");
    Ok(())
}

pub async fn check_in<A: LunchApi + ?Sized>(api: &A, took: bool) -> ClientResult<CheckinStatus> {
    api.check_in(took).await
}

pub async fn checkin_status<A: LunchApi + ?Sized>(api: &A) -> ClientResult<CheckinStatus> {
    api.checkin_status().await
}

/// Cancel one of the employee's own orders while it is still open.
pub async fn cancel_order<A: LunchApi + ?Sized>(api: &A, order: &Order) -> ClientResult<()> {
    let order_id = chef::cancellable_id(order)?;
    api.cancel_order(order_id).await?;
    tracing::info!(order_id, "Order cancelled");
    Ok(())
}
