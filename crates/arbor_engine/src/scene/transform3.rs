//! 3D scene nodes
//!
//! A [`Transform3`] holds a local position, quaternion rotation and scale.
//! Each world pass also caches the decomposed world position, rotation and
//! scale so lights and cameras can read them without redoing the math.
//! A node may carry a [`Light`], which makes it a light source.

use crate::error::{SceneError, SceneResult};
use crate::foundation::math::{Matrix4, Quaternion, Vector3};
use crate::render::light_manager::LightManager;
use crate::render::lighting::Light;
use crate::scene::hierarchy::{Node3Id, NodeTree, SceneNode};

/// Arena holding every node of a 3D graph
pub type Graph3 = NodeTree<Node3Id, Transform3>;

/// 3D scene node
#[derive(Debug, Clone, PartialEq)]
pub struct Transform3 {
    /// Local position
    pub position: Vector3,
    /// Local rotation
    pub rotation: Quaternion,
    /// Local scale
    pub scale: Vector3,
    /// Hidden nodes skip their whole subtree when drawing
    pub visible: bool,
    /// Recompose `matrix` from position/rotation/scale on every pass
    pub auto_update_matrix: bool,
    /// Local matrix
    pub matrix: Matrix4,
    /// Light payload, if this node emits light
    pub light: Option<Light>,
    world_matrix: Matrix4,
    world_position: Vector3,
    world_rotation: Quaternion,
    world_scale: Vector3,
}

impl Default for Transform3 {
    fn default() -> Self {
        Self {
            position: Vector3::ZERO,
            rotation: Quaternion::IDENTITY,
            scale: Vector3::ONE,
            visible: true,
            auto_update_matrix: true,
            matrix: Matrix4::IDENTITY,
            light: None,
            world_matrix: Matrix4::IDENTITY,
            world_position: Vector3::ZERO,
            world_rotation: Quaternion::IDENTITY,
            world_scale: Vector3::ONE,
        }
    }
}

impl Transform3 {
    /// Identity node at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Node carrying a light
    pub fn from_light(light: Light) -> Self {
        Self::default().with_light(light)
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vector3) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: Set rotation
    pub fn with_rotation(mut self, rotation: Quaternion) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set scale
    pub fn with_scale(mut self, scale: Vector3) -> Self {
        self.scale = scale;
        self
    }

    /// Builder pattern: Set visibility
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Builder pattern: Attach a light
    pub fn with_light(mut self, light: Light) -> Self {
        self.light = Some(light);
        self
    }

    /// Recompose the local matrix from position, rotation and scale
    pub fn update_matrix(&mut self) {
        self.matrix = Matrix4::make_transform(self.position, self.rotation, self.scale);
    }

    /// Move along `offset` expressed in the node's rotated frame
    pub fn translate(&mut self, offset: Vector3) {
        self.position += self.rotation.rotate(offset);
    }

    /// Move along the node's local X axis
    pub fn translate_x(&mut self, distance: f32) {
        self.translate(Vector3::new(distance, 0.0, 0.0));
    }

    /// Move along the node's local Y axis
    pub fn translate_y(&mut self, distance: f32) {
        self.translate(Vector3::new(0.0, distance, 0.0));
    }

    /// Move along the node's local Z axis
    pub fn translate_z(&mut self, distance: f32) {
        self.translate(Vector3::new(0.0, 0.0, distance));
    }

    /// Whether this node is a light source
    pub fn is_light(&self) -> bool {
        self.light.is_some()
    }

    /// World matrix from the last world pass
    pub fn world_matrix(&self) -> &Matrix4 {
        &self.world_matrix
    }

    /// World position from the last world pass
    pub fn world_position(&self) -> Vector3 {
        self.world_position
    }

    /// World rotation from the last world pass
    pub fn world_rotation(&self) -> Quaternion {
        self.world_rotation
    }

    /// World scale from the last world pass
    pub fn world_scale(&self) -> Vector3 {
        self.world_scale
    }

    /// Direction of the node's -Z axis in world space
    pub fn world_forward(&self) -> Vector3 {
        self.world_matrix.apply_to_direction(Vector3::FORWARD).normalized()
    }
}

impl SceneNode for Transform3 {
    type Matrix = Matrix4;

    fn refresh_local_matrix(&mut self) {
        if self.auto_update_matrix {
            self.update_matrix();
        }
    }

    fn local_matrix(&self) -> Matrix4 {
        self.matrix
    }

    fn world_matrix(&self) -> Matrix4 {
        self.world_matrix
    }

    fn set_world_matrix(&mut self, world: Matrix4) {
        self.world_matrix = world;
        let (position, rotation, scale) = world.decompose();
        self.world_position = position;
        self.world_rotation = rotation;
        self.world_scale = scale;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

impl NodeTree<Node3Id, Transform3> {
    /// Rotate node `id` so its -Z axis faces the world-space `target`
    ///
    /// The parent's world rotation is compensated so the result holds in
    /// world space. A target on the node's own position is ignored.
    pub fn look_at_3d(&mut self, id: Node3Id, target: Vector3, up: Vector3) -> SceneResult<()> {
        if !self.contains(id) {
            return Err(SceneError::NodeNotFound(format!("{:?}", id)));
        }
        self.update_world_matrix(id);

        let parent_rotation = self
            .parent(id)
            .and_then(|p| self.get(p))
            .map_or(Quaternion::IDENTITY, Transform3::world_rotation);

        let Some(node) = self.get_mut(id) else {
            return Ok(());
        };
        let eye = node.world_position;
        if (target - eye).length_squared() < f32::EPSILON {
            log::trace!("look_at_3d target coincides with node {:?}", id);
            return Ok(());
        }

        let facing = Matrix4::make_look_at(eye, target, up);
        let world_rotation = Quaternion::from_rotation_matrix(&facing);
        node.rotation = (parent_rotation.inverse() * world_rotation).normalized();
        Ok(())
    }

    /// Register every light under `root` whose strict ancestors are all
    /// visible
    ///
    /// A hidden light node itself is still registered so it keeps its slot;
    /// [`LightManager::update_lights`] zeroes its intensities.
    pub fn set_lights(&self, root: Node3Id, manager: &mut LightManager) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            if node.is_light() {
                manager.add_light(id);
            }
            if node.visible {
                stack.extend(self.children(id).iter().rev().copied());
            }
        }
    }
}
