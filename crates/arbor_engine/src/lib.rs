//! # Arbor Engine
//!
//! A small retained-mode scene-graph engine: 3D and 2D node hierarchies,
//! a camera, per-frame light aggregation and the linear algebra behind them.
//!
//! ## Features
//!
//! - **Scene Graph**: Arena-backed 3D and 2D hierarchies with generational ids
//! - **Math**: Column-major matrices, quaternions and vectors ready for GPU upload
//! - **Lighting**: Visible lights flattened into index-aligned arrays each frame
//! - **Backend Agnostic**: Drawing goes through the [`RenderBackend`](render::RenderBackend) trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arbor_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = Scene::new();
//!     scene.spawn3(Transform3::new().with_position(Vector3::new(0.0, 0.0, -5.0)));
//!     scene.spawn3(Transform3::from_light(Light::point(Vector3::ONE, 1.0)));
//!
//!     let mut camera = Camera::perspective(1.0, 16.0 / 9.0, 0.1, 100.0)?;
//!     let mut backend = RecordingBackend::new();
//!     let stats = scene.draw(&mut camera, &mut backend);
//!     assert_eq!(stats.lights, 1);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::many_single_char_names,
    clippy::float_cmp
)]

// Core engine modules
pub mod core;
pub mod config;
pub mod error;

pub mod foundation;
pub mod render;
pub mod scene;

pub use error::{SceneError, SceneResult};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        SceneError, SceneResult,
        foundation::math::{Matrix3, Matrix4, Quaternion, Vector2, Vector3},
        scene::{
            BoundingBox2, BoundingCircle, Camera, DrawStats, Graph2, Graph3, IntersectionMode,
            Node2Id, Node3Id, Projection, Scene, SceneChild, Transform2, Transform3,
        },
        render::{FrameContext, Light, LightArrays, LightManager, LightType, RecordingBackend, RenderBackend},
        core::config::{ApplicationConfig, CameraConfig, Config, EngineConfig},
    };
}
