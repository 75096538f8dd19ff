//! Tokens Module
//!
//! Creature tokens shown as camera-facing sprites sized by creature size,
//! with a hidden floor proxy under each monster.

pub mod manager;
pub mod placement;

pub use manager::TokenManager;
pub use placement::{PROXY_THICKNESS, TokenLayout};
