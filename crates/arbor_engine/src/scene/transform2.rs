//! 2D scene nodes
//!
//! A [`Transform2`] is a sprite-like node: position, counter-clockwise
//! rotation in radians, scale and a draw `layer`, plus optional bounding
//! volumes for overlap tests. Nodes live in a [`Graph2`] arena.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};
use crate::foundation::math::{Matrix3, Vector2};
use crate::scene::bounds::{BoundingBox2, BoundingCircle};
use crate::scene::hierarchy::{Node2Id, NodeTree, SceneNode};

/// Arena holding every node of a 2D graph
pub type Graph2 = NodeTree<Node2Id, Transform2>;

/// Bounding volume used by [`Transform2::intersects`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntersectionMode {
    /// Circles moved by position and grown by scale
    #[default]
    BoundingCircle,
    /// Boxes moved by position, rotation and scale
    AxisAlignedBoundingBox,
}

impl IntersectionMode {
    /// Numeric code of the mode
    pub fn code(self) -> u8 {
        match self {
            Self::BoundingCircle => 0,
            Self::AxisAlignedBoundingBox => 1,
        }
    }
}

impl TryFrom<u8> for IntersectionMode {
    type Error = SceneError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::BoundingCircle),
            1 => Ok(Self::AxisAlignedBoundingBox),
            other => Err(SceneError::InvalidArgument(format!("unknown intersection mode {}", other))),
        }
    }
}

impl FromStr for IntersectionMode {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "circle" | "bounding_circle" => Ok(Self::BoundingCircle),
            "aabb" | "box" | "axis_aligned_bounding_box" => Ok(Self::AxisAlignedBoundingBox),
            _ => Err(SceneError::InvalidArgument(format!("unknown intersection mode '{}'", s))),
        }
    }
}

impl fmt::Display for IntersectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoundingCircle => write!(f, "bounding_circle"),
            Self::AxisAlignedBoundingBox => write!(f, "axis_aligned_bounding_box"),
        }
    }
}

/// 2D scene node
#[derive(Debug, Clone, PartialEq)]
pub struct Transform2 {
    /// Local position
    pub position: Vector2,
    /// Local rotation in radians, counter-clockwise
    pub rotation: f32,
    /// Local scale
    pub scale: Vector2,
    /// Draw ordering hint for the backend
    pub layer: f32,
    /// Hidden nodes skip their whole subtree when drawing
    pub visible: bool,
    /// Recompose `matrix` from position/rotation/scale on every pass
    pub auto_update_matrix: bool,
    /// Local matrix
    pub matrix: Matrix3,
    /// World matrix, valid after a world pass
    pub world_matrix: Matrix3,
    /// Box volume for [`IntersectionMode::AxisAlignedBoundingBox`]
    pub bounding_box: Option<BoundingBox2>,
    /// Circle volume for [`IntersectionMode::BoundingCircle`]
    pub bounding_circle: Option<BoundingCircle>,
}

impl Default for Transform2 {
    fn default() -> Self {
        Self {
            position: Vector2::ZERO,
            rotation: 0.0,
            scale: Vector2::ONE,
            layer: 0.0,
            visible: true,
            auto_update_matrix: true,
            matrix: Matrix3::IDENTITY,
            world_matrix: Matrix3::IDENTITY,
            bounding_box: None,
            bounding_circle: None,
        }
    }
}

impl Transform2 {
    /// Identity node at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vector2) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: Set rotation
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set scale
    pub fn with_scale(mut self, scale: Vector2) -> Self {
        self.scale = scale;
        self
    }

    /// Builder pattern: Set layer
    pub fn with_layer(mut self, layer: f32) -> Self {
        self.layer = layer;
        self
    }

    /// Builder pattern: Set visibility
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Builder pattern: Attach a bounding box
    pub fn with_bounding_box(mut self, bounds: BoundingBox2) -> Self {
        self.bounding_box = Some(bounds);
        self
    }

    /// Builder pattern: Attach a bounding circle
    pub fn with_bounding_circle(mut self, bounds: BoundingCircle) -> Self {
        self.bounding_circle = Some(bounds);
        self
    }

    /// Recompose the local matrix from position, rotation and scale
    pub fn update_matrix(&mut self) {
        self.matrix = Matrix3::compose(self.position, self.rotation, self.scale);
    }

    /// Move along `offset` expressed in the node's rotated frame
    pub fn translate(&mut self, offset: Vector2) {
        self.position += offset.rotated(self.rotation);
    }

    /// Move along the node's local X axis
    pub fn translate_x(&mut self, distance: f32) {
        self.translate(Vector2::new(distance, 0.0));
    }

    /// Move along the node's local Y axis
    pub fn translate_y(&mut self, distance: f32) {
        self.translate(Vector2::new(0.0, distance));
    }

    /// World-space position from the last world pass
    pub fn world_position(&self) -> Vector2 {
        let mut p = Vector2::ZERO;
        p.set_position_from_matrix(&self.world_matrix);
        p
    }

    /// Overlap test in the parent frame, using local position/rotation/scale
    ///
    /// Fails closed: when either node lacks the volume `mode` needs the
    /// result is `false`.
    pub fn intersects(&self, other: &Transform2, mode: IntersectionMode) -> bool {
        match mode {
            IntersectionMode::BoundingCircle => match (self.bounding_circle, other.bounding_circle) {
                (Some(a), Some(b)) => a
                    .transformed(self.position, self.scale)
                    .intersects(&b.transformed(other.position, other.scale)),
                _ => false,
            },
            IntersectionMode::AxisAlignedBoundingBox => match (self.bounding_box, other.bounding_box) {
                (Some(a), Some(b)) => a
                    .transformed(self.position, self.rotation, self.scale)
                    .intersects(&b.transformed(other.position, other.rotation, other.scale)),
                _ => false,
            },
        }
    }
}

impl SceneNode for Transform2 {
    type Matrix = Matrix3;

    fn refresh_local_matrix(&mut self) {
        if self.auto_update_matrix {
            self.update_matrix();
        }
    }

    fn local_matrix(&self) -> Matrix3 {
        self.matrix
    }

    fn world_matrix(&self) -> Matrix3 {
        self.world_matrix
    }

    fn set_world_matrix(&mut self, world: Matrix3) {
        self.world_matrix = world;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

impl NodeTree<Node2Id, Transform2> {
    /// Turn node `id` so that `look_vector` (default [`Vector2::UP`]) points
    /// at the world-space `target`
    ///
    /// The node's world matrix is refreshed first. A target sitting on the
    /// node's world position leaves the rotation unchanged.
    pub fn look_at(&mut self, id: Node2Id, target: Vector2, look_vector: Option<Vector2>) -> SceneResult<()> {
        if !self.contains(id) {
            return Err(SceneError::NodeNotFound(format!("{:?}", id)));
        }
        self.update_world_matrix(id);

        let Some(node) = self.get_mut(id) else {
            return Ok(());
        };
        let (world_position, world_rotation, _) = node.world_matrix.decompose();
        let to_target = target - world_position;
        if to_target.length_squared() > 0.0 {
            let world_look = look_vector.unwrap_or(Vector2::UP).rotated(world_rotation);
            node.rotation += world_look.angle_between_signed(to_target);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_translate_follows_rotation() {
        let mut node = Transform2::new().with_rotation(FRAC_PI_2);
        node.translate_x(2.0);
        assert_relative_eq!(node.position, Vector2::new(0.0, 2.0), epsilon = EPSILON);

        node.translate_y(1.0);
        assert_relative_eq!(node.position, Vector2::new(-1.0, 2.0), epsilon = EPSILON);
    }

    #[test]
    fn test_manual_matrix_is_kept() {
        let mut graph = Graph2::new();
        let mut manual = Transform2::new().with_position(Vector2::new(9.0, 9.0));
        manual.auto_update_matrix = false;
        manual.matrix = Matrix3::make_translation(Vector2::new(1.0, 0.0));
        let id = graph.insert(manual);

        graph.compute_world_transform(id);

        assert_relative_eq!(graph.get(id).unwrap().world_position(), Vector2::new(1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_look_at_turns_up_vector_towards_target() {
        let mut graph = Graph2::new();
        let id = graph.insert(Transform2::new().with_position(Vector2::new(1.0, 1.0)));

        graph.look_at(id, Vector2::new(5.0, 1.0), None).unwrap();

        // UP turned to face +X is a clockwise quarter turn
        assert_relative_eq!(graph.get(id).unwrap().rotation, -FRAC_PI_2, epsilon = EPSILON);
    }

    #[test]
    fn test_look_at_accounts_for_parent_rotation() {
        let mut graph = Graph2::new();
        let parent = graph.insert(Transform2::new().with_rotation(FRAC_PI_2));
        let child = graph.insert(Transform2::new().with_position(Vector2::new(1.0, 0.0)));
        graph.add_child(parent, child).unwrap();

        // Child sits at world (0, 1) with its UP pointing to world -X
        graph.look_at(child, Vector2::new(0.0, 5.0), None).unwrap();
        graph.update_world_matrix(child);

        let (_, world_rotation, _) = graph.get(child).unwrap().world_matrix.decompose();
        let world_up = Vector2::UP.rotated(world_rotation);
        assert_relative_eq!(world_up, Vector2::UP, epsilon = EPSILON);
    }

    #[test]
    fn test_look_at_on_own_position_is_noop() {
        let mut graph = Graph2::new();
        let id = graph.insert(Transform2::new().with_position(Vector2::new(3.0, 4.0)).with_rotation(0.25));

        graph.look_at(id, Vector2::new(3.0, 4.0), Some(Vector2::RIGHT)).unwrap();

        assert_relative_eq!(graph.get(id).unwrap().rotation, 0.25);
    }

    #[test]
    fn test_look_at_custom_look_vector() {
        let mut graph = Graph2::new();
        let id = graph.insert(Transform2::new());

        graph.look_at(id, Vector2::new(-3.0, 0.0), Some(Vector2::RIGHT)).unwrap();

        assert_relative_eq!(graph.get(id).unwrap().rotation.abs(), PI, epsilon = EPSILON);
    }

    #[test]
    fn test_intersects_by_circle() {
        let circle = BoundingCircle::new(Vector2::ZERO, 1.0);
        let a = Transform2::new().with_bounding_circle(circle);
        let near = Transform2::new().with_position(Vector2::new(1.5, 0.0)).with_bounding_circle(circle);
        let far = Transform2::new().with_position(Vector2::new(2.5, 0.0)).with_bounding_circle(circle);
        let grown = far.clone().with_scale(Vector2::new(2.0, 2.0));

        assert!(a.intersects(&near, IntersectionMode::BoundingCircle));
        assert!(!a.intersects(&far, IntersectionMode::BoundingCircle));
        assert!(a.intersects(&grown, IntersectionMode::BoundingCircle));
    }

    #[test]
    fn test_intersects_by_box_with_rotation() {
        let thin = BoundingBox2::from_center_extents(Vector2::ZERO, Vector2::new(2.0, 0.1));
        let a = Transform2::new().with_bounding_box(thin);
        let b = Transform2::new().with_position(Vector2::new(0.0, 1.5)).with_bounding_box(thin);

        assert!(!a.intersects(&b, IntersectionMode::AxisAlignedBoundingBox));

        let turned = b.clone().with_rotation(FRAC_PI_2);
        assert!(a.intersects(&turned, IntersectionMode::AxisAlignedBoundingBox));
    }

    #[test]
    fn test_intersects_fails_closed_without_volumes() {
        let bare = Transform2::new();
        let boxed = Transform2::new().with_bounding_box(BoundingBox2::from_center_extents(Vector2::ZERO, Vector2::ONE));

        assert!(!bare.intersects(&boxed, IntersectionMode::AxisAlignedBoundingBox));
        assert!(!boxed.intersects(&boxed, IntersectionMode::BoundingCircle));
        assert!(boxed.intersects(&boxed, IntersectionMode::AxisAlignedBoundingBox));
    }

    #[test]
    fn test_intersection_mode_parsing() {
        assert_eq!("aabb".parse::<IntersectionMode>(), Ok(IntersectionMode::AxisAlignedBoundingBox));
        assert_eq!("Bounding_Circle".parse::<IntersectionMode>(), Ok(IntersectionMode::BoundingCircle));
        assert_eq!(IntersectionMode::try_from(1), Ok(IntersectionMode::AxisAlignedBoundingBox));
        assert!(matches!("sphere".parse::<IntersectionMode>(), Err(SceneError::InvalidArgument(_))));
        assert!(IntersectionMode::try_from(7).is_err());

        for mode in [IntersectionMode::BoundingCircle, IntersectionMode::AxisAlignedBoundingBox] {
            assert_eq!(mode.to_string().parse::<IntersectionMode>(), Ok(mode));
        }
    }
}
