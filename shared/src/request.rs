//! Request bodies posted to the lunch backend

use crate::models::OrderStatus;
use serde::{Deserialize, Serialize};

/// `POST /orders/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// `POST /orders/{id}/prep`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepUpdate {
    pub minutes: i64,
}

/// `POST /lunch-ready`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LunchReadyUpdate {
    pub ready: bool,
}

/// `POST /lunch-checkin`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckinRequest {
    pub took: bool,
}

/// `POST /menu/availability`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityUpdate {
    pub name: String,
    pub available: bool,
}
