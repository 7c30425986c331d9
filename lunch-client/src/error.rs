//! Client errors
//!
//! Two families share [`ClientError`]:
//!
//! - feed failures (transport, status, payload). A poll tick that hits one is
//!   dropped and logged at `debug`; the feed retries on its next period and the
//!   view keeps its previous state.
//! - [`ActionError`], raised before any request leaves the client when a chef
//!   or employee action is not allowed. Actions return every error to the
//!   caller, which decides how to surface it.

use shared::OrderStatus;
use std::ops::RangeInclusive;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 2xx reply whose body is unusable (e.g. empty)
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("Server rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidAction(#[from] ActionError),
}

/// Action refused locally
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("order has no id")]
    MissingOrderId,

    #[error("prep minutes must be within {}..={}, got {minutes}", .range.start(), .range.end())]
    PrepMinutesOutOfRange {
        minutes: i64,
        range: RangeInclusive<i64>,
    },

    #[error("cannot move order {order_id} from {from} to {to}")]
    IllegalTransition {
        order_id: i64,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("menu item name is empty")]
    EmptyItemName,
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
