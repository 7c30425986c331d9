//! Ring Model
//!
//! A ring is an ad-hoc call from an employee to the chef.

use crate::util::{opt_number, opt_string};
use serde::{Deserialize, Serialize};

/// Message tag the backend attaches when a ring announces a cancellation
pub const ORDER_CANCELLED_MESSAGE: &str = "Order cancelled";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingEvent {
    #[serde(default, deserialize_with = "opt_number")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "opt_string")]
    pub employee_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub created_at: Option<String>,
}

impl RingEvent {
    pub fn is_cancellation(&self) -> bool {
        self.message.as_deref() == Some(ORDER_CANCELLED_MESSAGE)
    }

    /// Who rang, "Someone" when unknown
    pub fn caller(&self) -> &str {
        match self.employee_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "Someone",
        }
    }
}
