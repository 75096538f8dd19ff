//! Navigation Module
//!
//! First-person walkthrough: movement flags driven by input events and a
//! per-frame integrator that moves the camera.

pub mod controller;
pub mod movement;

pub use controller::NavigationController;
pub use movement::{MovementState, SPRINT_SPEED, WALK_SPEED};
