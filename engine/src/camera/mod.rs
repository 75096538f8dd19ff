//! Camera Module
//!
//! First-person camera state and matrices. Window-system agnostic.

pub mod first_person;

pub use first_person::FirstPersonCamera;
