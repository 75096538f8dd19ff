//! Navigation Tests - Movement Flags, Sprint and Pointer Lock
//!
//! Drives the navigation controller with the same events the walkthrough
//! window produces.

use map_walker_engine::config::ViewerConfig;
use map_walker_engine::input::{CursorAction, KeyCode, MouseButton};
use map_walker_engine::navigation::{MovementState, NavigationController, SPRINT_SPEED, WALK_SPEED};

fn controller() -> NavigationController {
    let mut nav = NavigationController::new(&ViewerConfig::default());
    nav.place(0.0, 0.0);
    nav
}

// ============================================================================
// Sprint logic
// ============================================================================

#[test]
fn test_sprint_held_until_both_released() {
    let mut nav = controller();

    nav.handle_key(KeyCode::ShiftLeft, true);
    assert!(nav.movement().sprint);

    nav.handle_mouse_button(MouseButton::Right, true);
    assert!(nav.movement().sprint);

    nav.handle_key(KeyCode::ShiftLeft, false);
    assert!(nav.movement().sprint, "right mouse still held");
    assert_eq!(nav.movement().speed, SPRINT_SPEED);

    nav.handle_mouse_button(MouseButton::Right, false);
    assert!(!nav.movement().sprint);
    assert_eq!(nav.movement().speed, WALK_SPEED);
}

#[test]
fn test_mouse_release_keeps_shift_sprint() {
    let mut movement = MovementState::new();
    movement.set_mouse_right(true);
    movement.set_shift(true);
    movement.set_mouse_right(false);
    assert!(movement.sprint);
    movement.set_shift(false);
    assert!(!movement.sprint);
}

// ============================================================================
// Integration per tick
// ============================================================================

#[test]
fn test_idle_does_not_move() {
    let mut nav = controller();
    for _ in 0..10 {
        nav.tick();
    }
    assert_eq!(nav.camera.position.x, 0.0);
    assert_eq!(nav.camera.position.z, 0.0);
    assert!(!nav.movement().is_moving());
}

#[test]
fn test_walk_forward_hundred_frames() {
    let mut nav = controller();
    nav.handle_key(KeyCode::W, true);
    for _ in 0..100 {
        nav.tick();
    }
    assert!((nav.camera.position.z + 2.5).abs() < 1e-3);
    assert_eq!(nav.camera.position.y, nav.eye_height());
}

#[test]
fn test_opposite_keys_cancel() {
    let mut nav = controller();
    nav.handle_key(KeyCode::A, true);
    nav.handle_key(KeyCode::D, true);
    nav.tick();
    assert!(nav.camera.position.x.abs() < 1e-6);
}

#[test]
fn test_turning_changes_walk_direction() {
    let mut nav = controller();
    nav.handle_mouse_button(MouseButton::Left, true);
    // Quarter turn to the right at 0.002 rad per pixel
    nav.handle_mouse_motion(std::f32::consts::FRAC_PI_2 / 0.002, 0.0);
    nav.handle_key(KeyCode::W, true);
    nav.tick();
    assert!((nav.camera.position.x - 0.025).abs() < 1e-4);
    assert!(nav.camera.position.z.abs() < 1e-4);
}

#[test]
fn test_looking_down_does_not_sink() {
    let mut nav = controller();
    nav.camera.set_pitch(-1.4);
    nav.handle_key(KeyCode::W, true);
    for _ in 0..20 {
        nav.tick();
    }
    assert_eq!(nav.camera.position.y, 1.7);
    assert!((nav.camera.position.z + 0.5).abs() < 1e-4);
}

// ============================================================================
// Pointer lock
// ============================================================================

#[test]
fn test_click_locks_and_escape_unlocks() {
    let mut nav = controller();
    assert!(!nav.pointer().is_locked());

    assert_eq!(nav.handle_mouse_button(MouseButton::Left, true), CursorAction::ApplyState);
    assert!(nav.pointer().is_locked());
    assert!(!nav.pointer().should_cursor_be_visible());

    // A second click while locked changes nothing
    assert_eq!(nav.handle_mouse_button(MouseButton::Left, true), CursorAction::None);

    assert_eq!(nav.handle_key(KeyCode::Escape, true), CursorAction::ApplyState);
    assert!(!nav.pointer().is_locked());
    assert!(nav.pointer().should_cursor_be_visible());
}

#[test]
fn test_unlock_keeps_movement() {
    let mut nav = controller();
    nav.handle_mouse_button(MouseButton::Left, true);
    nav.handle_key(KeyCode::W, true);
    nav.handle_key(KeyCode::Escape, true);
    nav.tick();
    assert!(nav.movement().forward);
    assert!(nav.camera.position.z < 0.0);
}
