//! Data models
//!
//! Client-side projections of backend state. The client never owns any of
//! these; every poll replaces the previous copy wholesale.

pub mod lunch;
pub mod menu;
pub mod order;
pub mod preset;
pub mod ring;

// Re-exports
pub use lunch::*;
pub use menu::*;
pub use order::*;
pub use preset::*;
pub use ring::*;
