//! # Rendering Interface
//!
//! Everything the scene hands to a renderer: light payloads, the per-frame
//! light aggregation and the backend trait. No graphics API lives here; a
//! backend implementation is supplied by the application.

pub mod backend;
pub mod light_manager;
pub mod lighting;

pub use backend::{FrameContext, RecordingBackend, RenderBackend};
pub use light_manager::{LightArrays, LightManager};
pub use lighting::{Light, LightType};
