//! ClipForge Core Engine
//!
//! Core clip generation module. Handles window validation, reframe geometry,
//! caption mapping, the stage pipeline, and the collaborator backends.

pub mod captions;
pub mod config;
pub mod fetch;
pub mod ffmpeg;
pub mod geometry;
pub mod pipeline;
pub mod window;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;
