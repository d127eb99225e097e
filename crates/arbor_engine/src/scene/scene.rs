//! Scene: one 3D graph, one 2D graph and the light manager
//!
//! [`Scene::draw`] runs the whole frame: camera and world-transform passes,
//! light aggregation, then a preorder draw of both graphs into a
//! [`RenderBackend`].

use crate::error::SceneResult;
use crate::render::backend::{FrameContext, RenderBackend};
use crate::render::light_manager::LightManager;
use crate::scene::camera::Camera;
use crate::scene::hierarchy::{Node2Id, Node3Id};
use crate::scene::transform2::{Graph2, Transform2};
use crate::scene::transform3::{Graph3, Transform3};

/// A node that can be attached to one of the scene roots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneChild {
    /// Node of the 3D graph
    Node3(Node3Id),
    /// Node of the 2D graph
    Node2(Node2Id),
}

impl From<Node3Id> for SceneChild {
    fn from(id: Node3Id) -> Self {
        Self::Node3(id)
    }
}

impl From<Node2Id> for SceneChild {
    fn from(id: Node2Id) -> Self {
        Self::Node2(id)
    }
}

/// What one call to [`Scene::draw`] submitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// 3D nodes handed to the backend
    pub nodes3: usize,
    /// 2D nodes handed to the backend
    pub nodes2: usize,
    /// Lights flattened for the frame
    pub lights: usize,
}

/// Retained-mode scene
#[derive(Debug, Clone)]
pub struct Scene {
    graph3: Graph3,
    root3: Node3Id,
    graph2: Graph2,
    root2: Node2Id,
    light_manager: LightManager,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene with empty 3D and 2D roots
    pub fn new() -> Self {
        let mut graph3 = Graph3::new();
        let root3 = graph3.insert(Transform3::new());
        let mut graph2 = Graph2::new();
        let root2 = graph2.insert(Transform2::new());

        Self {
            graph3,
            root3,
            graph2,
            root2,
            light_manager: LightManager::new(),
        }
    }

    /// Root of the 3D graph
    pub fn root3(&self) -> Node3Id {
        self.root3
    }

    /// Root of the 2D graph
    pub fn root2(&self) -> Node2Id {
        self.root2
    }

    /// The 3D graph
    pub fn graph3(&self) -> &Graph3 {
        &self.graph3
    }

    /// The 3D graph, for building hierarchies and editing nodes
    pub fn graph3_mut(&mut self) -> &mut Graph3 {
        &mut self.graph3
    }

    /// The 2D graph
    pub fn graph2(&self) -> &Graph2 {
        &self.graph2
    }

    /// The 2D graph, for building hierarchies and editing nodes
    pub fn graph2_mut(&mut self) -> &mut Graph2 {
        &mut self.graph2
    }

    /// Lights registered and flattened by the last draw
    pub fn light_manager(&self) -> &LightManager {
        &self.light_manager
    }

    /// Attach an existing node to the matching root
    ///
    /// A node that already has a parent is moved.
    pub fn add(&mut self, child: impl Into<SceneChild>) -> SceneResult<()> {
        match child.into() {
            SceneChild::Node3(id) => self.graph3.add_child(self.root3, id),
            SceneChild::Node2(id) => self.graph2.add_child(self.root2, id),
        }
    }

    /// Insert a 3D node and attach it to the 3D root
    pub fn spawn3(&mut self, node: Transform3) -> Node3Id {
        let id = self.graph3.insert(node);
        if let Err(err) = self.graph3.add_child(self.root3, id) {
            log::error!("Failed to attach spawned node {:?}: {}", id, err);
        }
        id
    }

    /// Insert a 2D node and attach it to the 2D root
    pub fn spawn2(&mut self, node: Transform2) -> Node2Id {
        let id = self.graph2.insert(node);
        if let Err(err) = self.graph2.add_child(self.root2, id) {
            log::error!("Failed to attach spawned node {:?}: {}", id, err);
        }
        id
    }

    /// Insert a 3D node under `parent`
    pub fn spawn3_under(&mut self, parent: Node3Id, node: Transform3) -> SceneResult<Node3Id> {
        let id = self.graph3.insert(node);
        if let Err(err) = self.graph3.add_child(parent, id) {
            self.graph3.despawn(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Insert a 2D node under `parent`
    pub fn spawn2_under(&mut self, parent: Node2Id, node: Transform2) -> SceneResult<Node2Id> {
        let id = self.graph2.insert(node);
        if let Err(err) = self.graph2.add_child(parent, id) {
            self.graph2.despawn(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Destroy a 3D subtree; the root itself cannot be despawned
    pub fn despawn3(&mut self, id: Node3Id) -> Option<Transform3> {
        if id == self.root3 {
            log::warn!("Refusing to despawn the 3D root");
            return None;
        }
        self.graph3.despawn(id)
    }

    /// Destroy a 2D subtree; the root itself cannot be despawned
    pub fn despawn2(&mut self, id: Node2Id) -> Option<Transform2> {
        if id == self.root2 {
            log::warn!("Refusing to despawn the 2D root");
            return None;
        }
        self.graph2.despawn(id)
    }

    /// World-transform pass over both graphs
    pub fn compute_world_transforms(&mut self) {
        self.graph3.compute_world_transform(self.root3);
        self.graph2.compute_world_transform(self.root2);
    }

    /// Render one frame
    ///
    /// 1. camera world transform and view matrix
    /// 2. world pass over both graphs
    /// 3. light registration and flattening
    /// 4. preorder draw below each root, 3D before 2D
    ///
    /// Draw and light registration share one visibility rule: a hidden node,
    /// roots included, hides its whole subtree from both. The roots
    /// themselves are never handed to the backend.
    ///
    /// # Preconditions
    /// Single-threaded and synchronous. Nothing may mutate the scene or the
    /// camera while a frame is in flight; the backend callbacks only get
    /// shared borrows, and the light arrays they see are complete because
    /// flattening finishes before `begin_frame`.
    pub fn draw<B: RenderBackend + ?Sized>(&mut self, camera: &mut Camera, backend: &mut B) -> DrawStats {
        camera.compute_world_transform();
        self.compute_world_transforms();

        self.light_manager.clear();
        self.graph3.set_lights(self.root3, &mut self.light_manager);
        self.light_manager.update_lights(&self.graph3);

        let frame = FrameContext {
            view_matrix: camera.view_matrix(),
            projection_matrix: camera.projection_matrix(),
            view_projection_matrix: camera.view_projection_matrix(),
            camera_position: camera.world_position(),
            lights: self.light_manager.arrays(),
        };

        let mut stats = DrawStats {
            lights: frame.lights.len(),
            ..DrawStats::default()
        };

        let root3 = self.root3;
        let root2 = self.root2;
        backend.begin_frame(&frame);
        self.graph3.visit_visible(root3, |id, node| {
            if id != root3 {
                backend.draw_node3(id, node, &frame);
                stats.nodes3 += 1;
            }
        });
        self.graph2.visit_visible(root2, |id, node| {
            if id != root2 {
                backend.draw_node2(id, node);
                stats.nodes2 += 1;
            }
        });
        backend.end_frame();

        log::trace!(
            "Frame drawn: {} 3D nodes, {} 2D nodes, {} lights",
            stats.nodes3,
            stats.nodes2,
            stats.lights
        );
        stats
    }
}
