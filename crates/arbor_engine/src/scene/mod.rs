//! Scene graph
//!
//! Retained-mode hierarchy of 3D and 2D nodes. Nodes live in per-graph
//! arenas ([`NodeTree`]) and are addressed by generational ids, so removing
//! a node can never leave another node pointing at freed memory.
//!
//! ## Frame Flow
//!
//! ```text
//! Camera world transform
//!      ↓
//! World pass over the 3D and 2D graphs
//!      ↓
//! Light registration + flattening (LightManager)
//!      ↓
//! Preorder draw into a RenderBackend
//! ```

pub mod bounds;
pub mod camera;
pub mod hierarchy;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform2;
pub mod transform3;

#[cfg(test)]
mod tests;

pub use bounds::{BoundingBox2, BoundingCircle};
pub use camera::{Camera, Projection};
pub use hierarchy::{Node2Id, Node3Id, NodeTree, SceneNode};
pub use scene::{DrawStats, Scene, SceneChild};
pub use transform2::{Graph2, IntersectionMode, Transform2};
pub use transform3::{Graph3, Transform3};
