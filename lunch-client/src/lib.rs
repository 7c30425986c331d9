//! Lunch Client - polling core of the office lunch pages
//!
//! Talks to the lunch backend over HTTP, keeps the "what has this device
//! already seen" markers in a local store and turns every poll into a view
//! plus at most one notification.

pub mod aggregate;
pub mod chef;
pub mod config;
pub mod console;
pub mod employee;
pub mod error;
pub mod http;
pub mod logger;
pub mod menu;
pub mod notify;
pub mod poller;
pub mod progress;
pub mod store;
pub mod testing;
pub mod tracker;

pub use config::{ClientConfig, PollIntervals, Role};
pub use error::{ActionError, ClientError, ClientResult};
pub use http::{LunchApi, NetworkHttpClient};
pub use notify::{Banner, BannerSlot, Chime, Dispatcher, NativeNotifier, Tone};
pub use poller::{Feed, PollScheduler};
pub use store::{FileStore, KeyValueStore, MemoryStore, Preferences};

// Re-export shared types for convenience
pub use shared::{
    CheckinStatus, LunchCheckins, LunchPrediction, LunchReady, MenuItem, Order, OrderItem, OrderStatus,
    Preset, RingEvent,
};
