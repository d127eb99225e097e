//! # Core Engine Module
//!
//! Shared abstractions used throughout the engine. Currently this is the
//! unified configuration for the engine, the default camera and the
//! application.

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    CameraConfig,
    EngineConfig,
    ProjectionKind,
    Config,
    ConfigError,
    ConfigFormat,
};
