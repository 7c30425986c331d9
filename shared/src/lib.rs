//! Shared types for the lunch ordering client
//!
//! Wire models for every payload the lunch backend returns, the request
//! bodies the client posts back, and the lenient parsing helpers both use.

pub mod models;
pub mod request;
pub mod util;

// Re-exports
pub use models::{
    CheckinStatus, LunchCheckins, LunchPrediction, LunchReady, MenuItem, Order, OrderItem,
    OrderStatus, Preset, RingEvent,
};
pub use serde::{Deserialize, Serialize};
