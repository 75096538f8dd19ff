//! Input Module
//!
//! Platform-agnostic input types. The walkthrough binary translates winit
//! events into these so navigation can be driven without a window.

pub mod keyboard;
pub mod mouse;
pub mod pointer_lock;

pub use keyboard::{KeyCode, MoveKey};
pub use mouse::MouseButton;
pub use pointer_lock::{CursorAction, PointerLock};
