//! Navigation Controller
//!
//! Owns the first-person camera and turns input events into camera motion.
//! Events only touch `MovementState`, `PointerLock` and the camera angles;
//! `tick` is the single place the camera position changes.

use glam::Vec3;

use super::movement::MovementState;
use crate::camera::FirstPersonCamera;
use crate::config::ViewerConfig;
use crate::input::{CursorAction, KeyCode, MouseButton, PointerLock};

/// First-person walkthrough controls.
#[derive(Debug, Clone)]
pub struct NavigationController {
    pub camera: FirstPersonCamera,
    movement: MovementState,
    pointer: PointerLock,
    eye_height: f32,
}

impl NavigationController {
    pub fn new(config: &ViewerConfig) -> Self {
        let mut camera = FirstPersonCamera::with_lens(config.fov_degrees, config.near, config.far);
        camera.sensitivity = config.mouse_sensitivity;
        camera.position.y = config.eye_height;
        Self {
            camera,
            movement: MovementState::with_speeds(config.walk_speed, config.sprint_speed),
            pointer: PointerLock::new(),
            eye_height: config.eye_height,
        }
    }

    pub fn movement(&self) -> &MovementState {
        &self.movement
    }

    pub fn pointer(&self) -> &PointerLock {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut PointerLock {
        &mut self.pointer
    }

    pub fn eye_height(&self) -> f32 {
        self.eye_height
    }

    /// Key press or release. Escape releases the pointer.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> CursorAction {
        if let Some(direction) = key.move_key() {
            self.movement.set_direction(direction, pressed);
        } else if key.is_sprint() {
            self.movement.set_shift(pressed);
        } else if key == KeyCode::Escape && pressed {
            return self.pointer.handle_escape();
        }
        CursorAction::None
    }

    /// Mouse button press or release. Left click locks, right button sprints.
    pub fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) -> CursorAction {
        match button {
            MouseButton::Right => {
                self.movement.set_mouse_right(pressed);
                CursorAction::None
            }
            MouseButton::Left if pressed => self.pointer.handle_click(),
            _ => CursorAction::None,
        }
    }

    /// Raw mouse motion. Ignored unless the pointer is locked.
    pub fn handle_mouse_motion(&mut self, dx: f32, dy: f32) {
        if self.pointer.accepts_look() {
            self.camera.apply_mouse_delta(dx, dy);
        }
    }

    /// Focus loss suspends look and drops held keys.
    pub fn handle_focus(&mut self, focused: bool) -> CursorAction {
        if focused {
            self.pointer.handle_focus_gained()
        } else {
            self.pointer.handle_focus_lost();
            self.movement.reset();
            CursorAction::ApplyState
        }
    }

    /// Advance one frame: move along the ground axes, then pin the eye height.
    pub fn tick(&mut self) {
        let speed = self.movement.speed;
        let forward = self.camera.ground_forward();
        let right = self.camera.ground_right();

        let mut step = Vec3::ZERO;
        if self.movement.forward {
            step += forward * speed;
        }
        if self.movement.backward {
            step -= forward * speed;
        }
        if self.movement.left {
            step -= right * speed;
        }
        if self.movement.right {
            step += right * speed;
        }

        self.camera.position += step;
        self.camera.position.y = self.eye_height;
    }

    /// Place the camera on the ground plane at eye height.
    pub fn place(&mut self, x: f32, z: f32) {
        self.camera.position = Vec3::new(x, self.eye_height, z);
    }
}
