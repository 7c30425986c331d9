//! Order Model

use crate::util::{self, numeric_or_zero, opt_number, opt_numeric, opt_string, string_or_empty};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Order status
///
/// Pending → Preparing → Ready → Delivered, with Cancelled reachable from any
/// non-terminal status. Unknown or missing labels read as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Statuses a chef can move an order to from the board
    pub const CHEF_ACTIONS: [OrderStatus; 3] = [Self::Preparing, Self::Ready, Self::Delivered];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Preparing => "Preparing",
            Self::Ready => "Ready",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Strict parse of a wire label
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "Pending" => Some(Self::Pending),
            "Preparing" => Some(Self::Preparing),
            "Ready" => Some(Self::Ready),
            "Delivered" => Some(Self::Delivered),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Lenient parse, falling back to `Pending`
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or_default()
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Position on the forward path; `None` for the cancelled branch.
    const fn rank(&self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Preparing => Some(1),
            Self::Ready => Some(2),
            Self::Delivered => Some(3),
            Self::Cancelled => None,
        }
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.rank(), next.rank()) {
            (_, None) => true,
            (Some(current), Some(next)) => next > current,
            (None, Some(_)) => false,
        }
    }

    /// CSS-style badge class, e.g. `status-preparing`
    pub fn badge_class(&self) -> String {
        format!("status-{}", self.as_str().to_lowercase())
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .map(Self::from_label)
            .unwrap_or_default())
    }
}

/// One line of a structured order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "numeric_or_zero")]
    pub qty: i64,
}

impl OrderItem {
    pub fn new(name: impl Into<String>, qty: i64) -> Self {
        Self {
            name: name.into(),
            qty,
        }
    }
}

/// Order as returned by `/orders`, `/mate-orders` and `/my-orders`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, deserialize_with = "opt_number")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub employee_name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub order_text: String,
    #[serde(default, deserialize_with = "util::lenient_vec")]
    pub order_items: Vec<OrderItem>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub requirements: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "opt_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub created_at_iso: Option<String>,
    /// Declared prep duration in minutes
    #[serde(default, deserialize_with = "opt_numeric")]
    pub prep_minutes: Option<i64>,
    #[serde(default, deserialize_with = "opt_string")]
    pub prep_started_at: Option<String>,
    #[serde(default, deserialize_with = "opt_numeric")]
    pub suggested_eta: Option<i64>,
    #[serde(default, deserialize_with = "opt_string")]
    pub cancelled_at: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub ready_at: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub delivered_at: Option<String>,
    /// Set when the order was placed on behalf of a mate
    #[serde(default, deserialize_with = "opt_string")]
    pub mate_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub voice_filename: Option<String>,
}

impl Order {
    /// Creation time, preferring the ISO field
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at_iso
            .as_deref()
            .and_then(util::parse_timestamp)
            .or_else(|| self.created_at.as_deref().and_then(util::parse_timestamp))
    }

    pub fn prep_started(&self) -> Option<DateTime<Utc>> {
        self.prep_started_at.as_deref().and_then(util::parse_timestamp)
    }

    pub fn cancelled(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at.as_deref().and_then(util::parse_timestamp)
    }

    /// Declared prep duration, only when strictly positive
    pub fn prep_duration(&self) -> Option<TimeDelta> {
        self.prep_minutes
            .filter(|minutes| *minutes > 0)
            .and_then(TimeDelta::try_minutes)
    }

    /// Timestamp for display; falls back to the raw `created_at` text.
    pub fn display_time(&self) -> String {
        match self.created() {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => self.created_at.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_unknown_defaults_to_pending() {
        let order: Order = serde_json::from_str(r#"{"id": 1, "status": "Lost"}"#).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);

        let order: Order = serde_json::from_str(r#"{"id": 1, "status": null}"#).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);

        let order: Order = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);

        let order: Order = serde_json::from_str(r#"{"id": 1, "status": 3}"#).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_status_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Preparing));
        assert!(Pending.can_transition_to(Delivered));
        assert!(Preparing.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Cancelled));
        assert!(!Ready.can_transition_to(Preparing));
        assert!(!Preparing.can_transition_to(Preparing));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
    }

    #[test]
    fn test_lenient_order_payload() {
        let raw = r#"{
            "id": 7,
            "employee_name": "Asha",
            "order_text": "Tea x2",
            "order_items": [{"name": "Tea", "qty": "2"}, "garbage", {"name": null, "qty": 1}],
            "requirements": null,
            "status": "Preparing",
            "prep_minutes": "15",
            "prep_started_at": "2026-10-18T12:00:00+00:00",
            "suggested_eta": null
        }"#;
        let order: Order = serde_json::from_str(raw).unwrap();
        assert_eq!(order.id, Some(7));
        assert_eq!(order.order_items.len(), 2);
        assert_eq!(order.order_items[0], OrderItem::new("Tea", 2));
        assert_eq!(order.order_items[1].name, "");
        assert_eq!(order.requirements, "");
        assert_eq!(order.prep_minutes, Some(15));
        assert_eq!(order.prep_duration(), Some(TimeDelta::minutes(15)));
        assert!(order.prep_started().is_some());
        assert_eq!(order.suggested_eta, None);
    }

    #[test]
    fn test_mistyped_text_fields_keep_the_list() {
        let raw = r#"[
            {"id": 1, "status": "Cancelled", "cancelled_at": 1760781600, "created_at": false},
            {"id": 2, "employee_name": 42, "order_text": ["Tea"], "prep_started_at": {"t": 1}}
        ]"#;
        let orders: Vec<Order> = serde_json::from_str(raw).unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].cancelled_at, None);
        assert_eq!(orders[0].created_at, None);
        assert!(orders[0].cancelled().is_none());
        assert_eq!(orders[1].employee_name, "");
        assert_eq!(orders[1].order_text, "");
        assert_eq!(orders[1].prep_started_at, None);
    }

    #[test]
    fn test_non_numeric_id_is_ignored() {
        let order: Order = serde_json::from_str(r#"{"id": "9"}"#).unwrap();
        assert_eq!(order.id, None);
    }

    #[test]
    fn test_prep_duration_requires_positive_minutes() {
        let mut order = Order {
            prep_minutes: Some(0),
            ..Default::default()
        };
        assert!(order.prep_duration().is_none());
        order.prep_minutes = Some(-5);
        assert!(order.prep_duration().is_none());
        order.prep_minutes = None;
        assert!(order.prep_duration().is_none());
    }

    #[test]
    fn test_display_time_prefers_iso() {
        let order = Order {
            created_at: Some("2026-10-18 08:00:00".into()),
            created_at_iso: Some("2026-10-18T06:00:00+00:00".into()),
            ..Default::default()
        };
        assert_eq!(order.display_time(), "2026-10-18 06:00:00");

        let order = Order {
            created_at: Some("not a date".into()),
            ..Default::default()
        };
        assert_eq!(order.display_time(), "not a date");
    }

    #[test]
    fn test_status_serializes_as_label() {
        let json = serde_json::to_string(&OrderStatus::Ready).unwrap();
        assert_eq!(json, "\"Ready\"");
        assert_eq!(OrderStatus::Preparing.badge_class(), "status-preparing");
    }
}
