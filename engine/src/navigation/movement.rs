//! Movement State
//!
//! Directional and sprint flags set by input events and read once per frame.
//!
//! Sprint is an OR of two holds (left shift, right mouse button) and is
//! only released when both are up.

use crate::input::MoveKey;

/// Movement per frame while walking
pub const WALK_SPEED: f32 = 0.025;

/// Movement per frame while sprinting
pub const SPRINT_SPEED: f32 = 0.05;

/// Input-driven movement flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    /// Distance moved per frame along each active direction
    pub speed: f32,
    shift_held: bool,
    mouse_right_held: bool,
    walk_speed: f32,
    sprint_speed: f32,
}

impl Default for MovementState {
    fn default() -> Self {
        Self::with_speeds(WALK_SPEED, SPRINT_SPEED)
    }
}

impl MovementState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_speeds(walk_speed: f32, sprint_speed: f32) -> Self {
        Self {
            forward: false,
            backward: false,
            left: false,
            right: false,
            sprint: false,
            speed: walk_speed,
            shift_held: false,
            mouse_right_held: false,
            walk_speed,
            sprint_speed,
        }
    }

    /// Set the flag for one direction.
    pub fn set_direction(&mut self, key: MoveKey, pressed: bool) {
        match key {
            MoveKey::Forward => self.forward = pressed,
            MoveKey::Backward => self.backward = pressed,
            MoveKey::Left => self.left = pressed,
            MoveKey::Right => self.right = pressed,
        }
    }

    pub fn set_shift(&mut self, held: bool) {
        self.shift_held = held;
        self.update_sprint();
    }

    pub fn set_mouse_right(&mut self, held: bool) {
        self.mouse_right_held = held;
        self.update_sprint();
    }

    fn update_sprint(&mut self) {
        self.sprint = self.shift_held || self.mouse_right_held;
        self.speed = if self.sprint {
            self.sprint_speed
        } else {
            self.walk_speed
        };
    }

    /// True when any directional flag is set.
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Release every flag, e.g. when the window loses focus.
    pub fn reset(&mut self) {
        *self = Self::with_speeds(self.walk_speed, self.sprint_speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle_at_walk_speed() {
        let state = MovementState::new();
        assert!(!state.is_moving());
        assert!(!state.sprint);
        assert_eq!(state.speed, 0.025);
    }

    #[test]
    fn test_direction_flags() {
        let mut state = MovementState::new();
        state.set_direction(MoveKey::Forward, true);
        state.set_direction(MoveKey::Left, true);
        assert!(state.forward && state.left);
        assert!(state.is_moving());
        state.set_direction(MoveKey::Forward, false);
        state.set_direction(MoveKey::Left, false);
        assert!(!state.is_moving());
    }

    #[test]
    fn test_shift_then_mouse_release_order() {
        let mut state = MovementState::new();
        state.set_shift(true);
        state.set_mouse_right(true);
        state.set_shift(false);
        assert!(state.sprint);
        assert_eq!(state.speed, 0.05);
        state.set_mouse_right(false);
        assert!(!state.sprint);
        assert_eq!(state.speed, 0.025);
    }

    #[test]
    fn test_mouse_then_shift_release_order() {
        let mut state = MovementState::new();
        state.set_mouse_right(true);
        state.set_shift(true);
        state.set_mouse_right(false);
        assert!(state.sprint);
        state.set_shift(false);
        assert!(!state.sprint);
    }

    #[test]
    fn test_sprint_does_not_touch_directions() {
        let mut state = MovementState::new();
        state.set_direction(MoveKey::Right, true);
        state.set_shift(true);
        state.set_shift(false);
        assert!(state.right);
    }

    #[test]
    fn test_reset_keeps_speeds() {
        let mut state = MovementState::with_speeds(0.1, 0.3);
        state.set_shift(true);
        state.set_direction(MoveKey::Backward, true);
        state.reset();
        assert!(!state.backward);
        assert!(!state.sprint);
        assert_eq!(state.speed, 0.1);
        state.set_shift(true);
        assert_eq!(state.speed, 0.3);
    }
}
