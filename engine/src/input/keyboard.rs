//! Keyboard Input Module
//!
//! Generic key codes, decoupled from winit so navigation can be driven and
//! tested without a window.

/// Keys the walkthrough reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Movement keys
    W,
    A,
    S,
    D,
    ShiftLeft,
    ShiftRight,

    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // View toggles
    F,
    R,
    V,

    Escape,

    /// Catch-all for unhandled keys
    Unknown,
}

/// Direction a movement key drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
}

impl KeyCode {
    /// WASD and the arrow keys map onto the four move directions.
    pub fn move_key(self) -> Option<MoveKey> {
        match self {
            KeyCode::W | KeyCode::ArrowUp => Some(MoveKey::Forward),
            KeyCode::S | KeyCode::ArrowDown => Some(MoveKey::Backward),
            KeyCode::A | KeyCode::ArrowLeft => Some(MoveKey::Left),
            KeyCode::D | KeyCode::ArrowRight => Some(MoveKey::Right),
            _ => None,
        }
    }

    /// Only the left shift key sprints.
    pub fn is_sprint(self) -> bool {
        self == KeyCode::ShiftLeft
    }
}
