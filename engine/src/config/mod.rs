//! Config Module
//!
//! Centralized configuration for the walkthrough viewer.

pub mod viewer_config;

pub use viewer_config::ViewerConfig;
