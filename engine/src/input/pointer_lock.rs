//! Pointer Lock Module
//!
//! Tracks whether the cursor is captured for mouse look.
//!
//! - Clicking the view captures the cursor.
//! - Escape releases it.
//! - Mouse motion only turns the camera while captured.
//!
//! The lock only records intent. The window layer reads `is_dirty` and
//! applies grab/visibility when it changes.

/// What the window layer should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorAction {
    None,
    /// Re-apply grab mode and visibility to the window
    ApplyState,
}

/// Pointer capture state.
#[derive(Debug, Clone)]
pub struct PointerLock {
    locked: bool,
    has_focus: bool,
    state_dirty: bool,
}

impl Default for PointerLock {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerLock {
    /// Start released; the first click captures.
    pub fn new() -> Self {
        Self {
            locked: false,
            has_focus: true,
            state_dirty: true,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn is_dirty(&self) -> bool {
        self.state_dirty
    }

    pub fn clear_dirty(&mut self) {
        self.state_dirty = false;
    }

    pub fn lock(&mut self) {
        if !self.locked {
            self.locked = true;
            self.state_dirty = true;
        }
    }

    pub fn unlock(&mut self) {
        if self.locked {
            self.locked = false;
            self.state_dirty = true;
        }
    }

    /// Escape releases a captured cursor.
    pub fn handle_escape(&mut self) -> CursorAction {
        if self.locked {
            self.unlock();
            CursorAction::ApplyState
        } else {
            CursorAction::None
        }
    }

    /// A click on the view captures a released cursor.
    pub fn handle_click(&mut self) -> CursorAction {
        if !self.locked {
            self.lock();
            CursorAction::ApplyState
        } else {
            CursorAction::None
        }
    }

    pub fn handle_focus_gained(&mut self) -> CursorAction {
        self.has_focus = true;
        self.state_dirty = true;
        CursorAction::ApplyState
    }

    /// Losing focus suspends the grab but remembers the lock.
    pub fn handle_focus_lost(&mut self) {
        self.has_focus = false;
        self.state_dirty = true;
    }

    /// Mouse motion turns the camera only while this is true.
    pub fn accepts_look(&self) -> bool {
        self.locked && self.has_focus
    }

    pub fn should_cursor_be_visible(&self) -> bool {
        !self.accepts_look()
    }

    pub fn should_cursor_be_grabbed(&self) -> bool {
        self.accepts_look()
    }

    pub fn status_message(&self) -> &'static str {
        if self.locked {
            "Mouse look enabled. ESC to release cursor."
        } else {
            "Click to look around."
        }
    }
}
