//! Backend abstraction traits for the rendering system
//!
//! The scene never talks to a graphics API. Once per frame it hands a
//! [`RenderBackend`] the camera matrices and the flattened light arrays,
//! then walks its visible nodes and offers each one to the backend.

use crate::foundation::math::{Matrix4, Vector3};
use crate::render::light_manager::LightArrays;
use crate::scene::hierarchy::{Node2Id, Node3Id};
use crate::scene::transform2::Transform2;
use crate::scene::transform3::Transform3;

/// Per-frame data shared by every draw call
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// Camera view matrix (inverse of its world matrix)
    pub view_matrix: &'a Matrix4,
    /// Camera projection matrix
    pub projection_matrix: &'a Matrix4,
    /// `projection * view`
    pub view_projection_matrix: Matrix4,
    /// Camera world position, for specular terms
    pub camera_position: Vector3,
    /// Flattened light data for this frame
    pub lights: LightArrays<'a>,
}

/// Main rendering backend trait
///
/// Implementations upload what they need; matrices expose their column-major
/// buffers through `as_slice` and every math type is `bytemuck::Pod`.
pub trait RenderBackend {
    /// Called once before any node of the frame is drawn
    fn begin_frame(&mut self, frame: &FrameContext<'_>);

    /// Draw one visible 3D node; its world matrix is current
    fn draw_node3(&mut self, id: Node3Id, node: &Transform3, frame: &FrameContext<'_>);

    /// Draw one visible 2D node; its world matrix is current
    fn draw_node2(&mut self, id: Node2Id, node: &Transform2);

    /// Called once after the last node of the frame
    fn end_frame(&mut self) {}
}

/// Backend that records what it was asked to draw
///
/// Useful for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingBackend {
    /// Frames begun so far
    pub frames_begun: usize,
    /// Frames ended so far
    pub frames_ended: usize,
    /// 3D nodes drawn in the current frame, in draw order
    pub nodes3: Vec<Node3Id>,
    /// 2D nodes drawn in the current frame, in draw order
    pub nodes2: Vec<Node2Id>,
    /// Number of lights seen at the start of the current frame
    pub light_count: usize,
    /// Light type codes seen at the start of the current frame
    pub light_types: Vec<f32>,
}

impl RecordingBackend {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for RecordingBackend {
    fn begin_frame(&mut self, frame: &FrameContext<'_>) {
        self.frames_begun += 1;
        self.nodes3.clear();
        self.nodes2.clear();
        self.light_count = frame.lights.len();
        self.light_types = frame.lights.types.to_vec();
    }

    fn draw_node3(&mut self, id: Node3Id, _node: &Transform3, _frame: &FrameContext<'_>) {
        self.nodes3.push(id);
    }

    fn draw_node2(&mut self, id: Node2Id, _node: &Transform2) {
        self.nodes2.push(id);
    }

    fn end_frame(&mut self) {
        self.frames_ended += 1;
    }
}
