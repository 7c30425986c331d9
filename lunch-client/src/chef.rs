//! Chef dashboard
//!
//! [`ChefState`] holds the persisted markers of the kitchen page; the `poll_*`
//! functions are one tick of each chef feed and always recompute the whole
//! view from the latest payload, so a repeated or overlapping tick is
//! harmless.

use crate::aggregate::{self, GroupedItem};
use crate::http::LunchApi;
use crate::menu::{self, MenuSection};
use crate::notify::{BannerSlot, Dispatcher};
use crate::store::KeyValueStore;
use crate::tracker::{OrderWatermark, SeenIdSet, SeenMarker};
use crate::{ActionError, ClientResult};
use chrono::{DateTime, Utc};
use shared::{LunchCheckins, LunchPrediction, LunchReady, Order, OrderStatus, RingEvent};
use std::sync::Arc;

/// Accepted prep durations in minutes
pub const PREP_MINUTES_RANGE: std::ops::RangeInclusive<i64> = 1..=240;

/// Predictions are only shown from this hour on
pub const PREDICTION_FROM_HOUR: i64 = 10;

/// Controls offered on an order card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardActions {
    /// Prep timer input, with the server's suggestion as default
    pub prep: Option<PrepControl>,
    /// Status buttons and whether each is enabled
    pub statuses: Vec<(OrderStatus, bool)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepControl {
    pub current_minutes: Option<i64>,
    pub suggested_eta: Option<i64>,
}

impl CardActions {
    pub fn for_order(order: &Order) -> Self {
        if order.status.is_terminal() {
            return Self {
                prep: None,
                statuses: Vec::new(),
            };
        }
        Self {
            prep: Some(PrepControl {
                current_minutes: order.prep_minutes,
                suggested_eta: order.suggested_eta.filter(|eta| *eta > 0),
            }),
            statuses: OrderStatus::CHEF_ACTIONS
                .iter()
                .map(|status| (*status, *status != order.status))
                .collect(),
        }
    }
}

/// One hero card
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCard {
    pub order: Order,
    pub badge: String,
    pub time: String,
    pub actions: CardActions,
}

/// Chef board after an orders tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChefBoard {
    pub cards: Vec<OrderCard>,
    /// Hidden when empty
    pub groups: Vec<GroupedItem>,
    pub new_order: bool,
}

/// Check-in card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckinBoard {
    /// Lunch is not ready
    Hidden,
    Empty,
    Summary { count: i64, names: Vec<String> },
}

impl CheckinBoard {
    pub fn from_checkins(checkins: &LunchCheckins) -> Self {
        if checkins.names.is_empty() {
            return CheckinBoard::Empty;
        }
        CheckinBoard::Summary {
            count: checkins.total(),
            names: checkins.names.clone(),
        }
    }

    /// Headline of the card; `None` while hidden
    pub fn headline(&self) -> Option<String> {
        match self {
            CheckinBoard::Hidden => None,
            CheckinBoard::Empty => Some("No check-ins yet.".to_string()),
            CheckinBoard::Summary { count, .. } => Some(format!("{count} checked in")),
        }
    }
}

/// Prediction line, if one should be shown
pub fn prediction_text(prediction: &LunchPrediction) -> Option<String> {
    let predicted = prediction.predicted.filter(|p| *p != 0)?;
    if prediction.date.is_empty() {
        return None;
    }
    if prediction.hour.is_some_and(|h| h < PREDICTION_FROM_HOUR) {
        return None;
    }
    Some(format!("({predicted}) number of people is expected for lunch today"))
}

/// Persisted state of the chef page
#[derive(Clone)]
pub struct ChefState {
    orders: OrderWatermark,
    rings: SeenIdSet,
    prediction: SeenMarker,
    dispatcher: Arc<Dispatcher>,
}

impl ChefState {
    pub fn new(store: Arc<dyn KeyValueStore>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            orders: OrderWatermark::new(store.clone()),
            rings: SeenIdSet::rings(store.clone()),
            prediction: SeenMarker::prediction(store),
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Rebuild the board from a fresh order list.
    pub fn handle_orders(&self, orders: &[Order], now: DateTime<Utc>) -> ChefBoard {
        let new_order = self.orders.observe(orders.iter().filter_map(|o| o.id));
        if new_order {
            self.dispatcher.new_order();
        }

        let hero = aggregate::hero_orders(orders, now);
        let groups = aggregate::board_groups(&hero);
        let cards = hero
            .into_iter()
            .map(|order| OrderCard {
                badge: order.status.badge_class(),
                time: order.display_time(),
                actions: CardActions::for_order(order),
                order: order.clone(),
            })
            .collect();

        ChefBoard {
            cards,
            groups,
            new_order,
        }
    }

    /// Announce at most one unseen ring per tick.
    pub fn handle_rings(&self, rings: &[RingEvent]) -> Option<RingEvent> {
        let ring = self.rings.take_first_unseen(rings, |r| r.id)?;
        self.dispatcher.ring(ring);
        Some(ring.clone())
    }

    /// Mirror the server flag into the cached toggle.
    pub fn handle_lunch_ready(&self, state: &LunchReady) -> bool {
        self.dispatcher
            .preferences()
            .set_lunch_ready_cached(state.is_ready);
        state.is_ready
    }

    pub fn lunch_ready_cached(&self) -> bool {
        self.dispatcher.preferences().lunch_ready_cached()
    }

    pub fn handle_checkins(&self, checkins: &LunchCheckins) -> CheckinBoard {
        if !self.lunch_ready_cached() {
            return CheckinBoard::Hidden;
        }
        CheckinBoard::from_checkins(checkins)
    }

    /// Show the prediction; chime the first time a date is seen.
    pub fn handle_prediction(&self, prediction: &LunchPrediction) -> Option<String> {
        let Some(text) = prediction_text(prediction) else {
            self.dispatcher.hide(BannerSlot::Prediction);
            return None;
        };
        let first_time = self.prediction.acknowledge(&prediction.date);
        self.dispatcher.prediction(&text, first_time);
        Some(text)
    }
}

// ============================================================================
// Poll ticks
// ============================================================================

pub async fn poll_orders<A: LunchApi + ?Sized>(api: &A, state: &ChefState) -> ClientResult<ChefBoard> {
    let orders = api.orders().await?;
    Ok(state.handle_orders(&orders, Utc::now()))
}

pub async fn poll_rings<A: LunchApi + ?Sized>(api: &A, state: &ChefState) -> ClientResult<Option<RingEvent>> {
    let rings = api.rings().await?;
    Ok(state.handle_rings(&rings))
}

pub async fn poll_lunch_ready<A: LunchApi + ?Sized>(api: &A, state: &ChefState) -> ClientResult<bool> {
    let lunch = api.lunch_ready().await?;
    Ok(state.handle_lunch_ready(&lunch))
}

/// Skips the request while lunch is not ready.
pub async fn poll_checkins<A: LunchApi + ?Sized>(api: &A, state: &ChefState) -> ClientResult<CheckinBoard> {
    if !state.lunch_ready_cached() {
        return Ok(CheckinBoard::Hidden);
    }
    let checkins = api.lunch_checkins().await?;
    Ok(state.handle_checkins(&checkins))
}

pub async fn poll_prediction<A: LunchApi + ?Sized>(api: &A, state: &ChefState) -> ClientResult<Option<String>> {
    let prediction = api.lunch_prediction().await?;
    Ok(state.handle_prediction(&prediction))
}

pub async fn poll_menu<A: LunchApi + ?Sized>(api: &A) -> ClientResult<Vec<MenuSection>> {
    let items = api.menu().await?;
    Ok(menu::group_by_category(&items))
}

// ============================================================================
// Actions
// ============================================================================

/// Start the prep timer (1..=240 minutes).
pub async fn start_prep<A: LunchApi + ?Sized>(api: &A, order_id: i64, minutes: i64) -> ClientResult<()> {
    if !PREP_MINUTES_RANGE.contains(&minutes) {
        return Err(ActionError::PrepMinutesOutOfRange {
            minutes,
            range: PREP_MINUTES_RANGE,
        }
        .into());
    }
    api.start_prep(order_id, minutes).await?;
    tracing::info!(order_id, minutes, "Prep started");
    Ok(())
}

/// Move an order forward; backwards or terminal moves are refused locally.
pub async fn set_status<A: LunchApi + ?Sized>(api: &A, order: &Order, next: OrderStatus) -> ClientResult<()> {
    let order_id = order.id.ok_or(ActionError::MissingOrderId)?;
    if next == OrderStatus::Cancelled || !order.status.can_transition_to(next) {
        return Err(ActionError::IllegalTransition {
            order_id,
            from: order.status,
            to: next,
        }
        .into());
    }
    api.set_order_status(order_id, next).await?;
    tracing::info!(order_id, status = %next, "Order status updated");
    Ok(())
}

/// Id of an order that may still be cancelled
pub(crate) fn cancellable_id(order: &Order) -> ClientResult<i64> {
    let order_id = order.id.ok_or(ActionError::MissingOrderId)?;
    if !order.status.can_transition_to(OrderStatus::Cancelled) {
        return Err(ActionError::IllegalTransition {
            order_id,
            from: order.status,
            to: OrderStatus::Cancelled,
        }
        .into());
    }
    Ok(order_id)
}

/// Cancel an order from the board.
pub async fn cancel_order<A: LunchApi + ?Sized>(api: &A, order: &Order) -> ClientResult<()> {
    let order_id = cancellable_id(order)?;
    api.cancel_order(order_id).await?;
    tracing::info!(order_id, "Order cancelled by chef");
    Ok(())
}

/// Flip the lunch-ready toggle and cache it once the server accepted it.
pub async fn set_lunch_ready<A: LunchApi + ?Sized>(api: &A, state: &ChefState, ready: bool) -> ClientResult<()> {
    api.set_lunch_ready(ready).await?;
    state.dispatcher.preferences().set_lunch_ready_cached(ready);
    tracing::info!(ready, "Lunch-ready toggled");
    Ok(())
}

pub async fn set_availability<A: LunchApi + ?Sized>(api: &A, name: &str, available: bool) -> ClientResult<()> {
    if name.trim().is_empty() {
        return Err(ActionError::EmptyItemName.into());
    }
    api.set_availability(name, available).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_actions() {
        let order = Order {
            id: Some(1),
            status: OrderStatus::Preparing,
            suggested_eta: Some(12),
            ..Default::default()
        };
        let actions = CardActions::for_order(&order);
        assert_eq!(actions.prep.unwrap().suggested_eta, Some(12));
        assert_eq!(
            actions.statuses,
            vec![
                (OrderStatus::Preparing, false),
                (OrderStatus::Ready, true),
                (OrderStatus::Delivered, true)
            ]
        );

        for status in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            let done = Order {
                status,
                ..Default::default()
            };
            let actions = CardActions::for_order(&done);
            assert!(actions.prep.is_none());
            assert!(actions.statuses.is_empty());
        }
    }

    #[test]
    fn test_prediction_text_rules() {
        let prediction = |predicted: Option<i64>, hour: Option<i64>, date: &str| LunchPrediction {
            predicted,
            hour,
            date: date.to_string(),
        };
        assert_eq!(
            prediction_text(&prediction(Some(14), Some(11), "2026-10-18")).as_deref(),
            Some("(14) number of people is expected for lunch today")
        );
        assert!(prediction_text(&prediction(Some(14), Some(9), "2026-10-18")).is_none());
        assert!(prediction_text(&prediction(Some(0), Some(11), "2026-10-18")).is_none());
        assert!(prediction_text(&prediction(None, Some(11), "2026-10-18")).is_none());
        assert!(prediction_text(&prediction(Some(14), Some(11), "")).is_none());
    }

    #[test]
    fn test_prediction_without_hour_is_shown() {
        let prediction = LunchPrediction {
            predicted: Some(9),
            hour: None,
            date: "2026-10-18".to_string(),
        };
        assert_eq!(
            prediction_text(&prediction).as_deref(),
            Some("(9) number of people is expected for lunch today")
        );
    }

    #[tokio::test]
    async fn test_actions_refused_locally() {
        struct NoBackend;

        #[async_trait::async_trait]
        impl LunchApi for NoBackend {
            async fn orders(&self) -> ClientResult<Vec<Order>> {
                unreachable!()
            }
            async fn order(&self, _: i64) -> ClientResult<Order> {
                unreachable!()
            }
            async fn set_order_status(&self, _: i64, _: OrderStatus) -> ClientResult<()> {
                unreachable!()
            }
            async fn start_prep(&self, _: i64, _: i64) -> ClientResult<()> {
                unreachable!()
            }
            async fn cancel_order(&self, _: i64) -> ClientResult<()> {
                unreachable!()
            }
            async fn mate_orders(&self) -> ClientResult<Vec<Order>> {
                unreachable!()
            }
            async fn my_orders(&self) -> ClientResult<Vec<Order>> {
                unreachable!()
            }
            async fn rings(&self) -> ClientResult<Vec<RingEvent>> {
                unreachable!()
            }
            async fn ring(&self) -> ClientResult<()> {
                unreachable!()
            }
            async fn lunch_ready(&self) -> ClientResult<LunchReady> {
                unreachable!()
            }
            async fn set_lunch_ready(&self, _: bool) -> ClientResult<()> {
                unreachable!()
            }
            async fn lunch_checkins(&self) -> ClientResult<LunchCheckins> {
                unreachable!()
            }
            async fn checkin_status(&self) -> ClientResult<shared::CheckinStatus> {
                unreachable!()
            }
            async fn check_in(&self, _: bool) -> ClientResult<shared::CheckinStatus> {
                unreachable!()
            }
            async fn lunch_prediction(&self) -> ClientResult<LunchPrediction> {
                unreachable!()
            }
            async fn menu(&self) -> ClientResult<Vec<shared::MenuItem>> {
                unreachable!()
            }
            async fn set_availability(&self, _: &str, _: bool) -> ClientResult<()> {
                unreachable!()
            }
            async fn presets(&self) -> ClientResult<Vec<shared::Preset>> {
                unreachable!()
            }
        }

        let refused = |result: ClientResult<()>| match result {
            Err(crate::ClientError::InvalidAction(e)) => e,
            other => panic!("expected a local refusal, got {other:?}"),
        };

        assert_eq!(
            refused(start_prep(&NoBackend, 1, 241).await),
            ActionError::PrepMinutesOutOfRange {
                minutes: 241,
                range: PREP_MINUTES_RANGE
            }
        );

        let ready = Order {
            id: Some(4),
            status: OrderStatus::Ready,
            ..Default::default()
        };
        assert_eq!(
            refused(set_status(&NoBackend, &ready, OrderStatus::Preparing).await),
            ActionError::IllegalTransition {
                order_id: 4,
                from: OrderStatus::Ready,
                to: OrderStatus::Preparing
            }
        );

        let delivered = Order {
            id: Some(5),
            status: OrderStatus::Delivered,
            ..Default::default()
        };
        assert_eq!(
            refused(cancel_order(&NoBackend, &delivered).await),
            ActionError::IllegalTransition {
                order_id: 5,
                from: OrderStatus::Delivered,
                to: OrderStatus::Cancelled
            }
        );
        assert_eq!(
            refused(set_status(&NoBackend, &Order::default(), OrderStatus::Ready).await),
            ActionError::MissingOrderId
        );
        assert_eq!(
            refused(set_availability(&NoBackend, "  ", false).await),
            ActionError::EmptyItemName
        );
    }

    #[test]
    fn test_checkin_board() {
        let board = CheckinBoard::from_checkins(&LunchCheckins {
            names: vec!["Ravi".into()],
            count: None,
        });
        assert_eq!(
            board,
            CheckinBoard::Summary {
                count: 1,
                names: vec!["Ravi".into()]
            }
        );
        assert_eq!(board.headline().as_deref(), Some("1 checked in"));
        assert_eq!(CheckinBoard::from_checkins(&LunchCheckins::default()), CheckinBoard::Empty);
        assert_eq!(CheckinBoard::Empty.headline().as_deref(), Some("No check-ins yet."));
        assert!(CheckinBoard::Hidden.headline().is_none());
    }

    #[test]
    fn test_prediction_chimes_once_per_date() {
        use crate::store::MemoryStore;
        use crate::testing::{RecordingBanner, RecordingChime, RecordingNotifier};

        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let chime = Arc::new(RecordingChime::default());
        let banner = Arc::new(RecordingBanner::default());
        let dispatcher = Arc::new(Dispatcher::new(
            store.clone(),
            chime.clone(),
            Arc::new(RecordingNotifier::new(false)),
            banner.clone(),
        ));
        let state = ChefState::new(store, dispatcher);
        let today = LunchPrediction {
            predicted: Some(9),
            hour: Some(12),
            date: "2026-10-18".into(),
        };

        assert!(state.handle_prediction(&today).is_some());
        assert!(state.handle_prediction(&today).is_some());
        assert_eq!(chime.played().len(), 1);
        assert_eq!(banner.shown_in(BannerSlot::Prediction).len(), 2);

        let early = LunchPrediction {
            hour: Some(8),
            ..today
        };
        assert!(state.handle_prediction(&early).is_none());
        assert_eq!(banner.hidden(), vec![BannerSlot::Prediction]);
    }
}
