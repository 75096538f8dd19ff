//! Error Types
//!
//! Only failures that stop a scene from existing at all are errors here.
//! Malformed surfaces, failed door cuts and missing textures degrade
//! gracefully and are reported through `tracing` instead.

use thiserror::Error;

/// Fatal errors surfaced to the caller of the scene driver.
#[derive(Error, Debug)]
pub enum SceneError {
    /// The GPU adapter, device or surface could not be created.
    #[error("renderer initialization failed: {0}")]
    RendererInit(String),

    /// An operation that needs a live scene ran before `initialize`
    /// or after `cleanup`.
    #[error("scene is not initialized")]
    NotInitialized,

    /// The persisted scene or config JSON could not be parsed.
    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a scene, config or image file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
