//! 2D bounding volumes used for overlap tests between sprites

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Matrix3, Vector2};

/// Axis-aligned bounding box in 2D
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    /// Minimum corner of the bounding box
    pub min: Vector2,
    /// Maximum corner of the bounding box
    pub max: Vector2,
}

impl BoundingBox2 {
    /// Create a new box from min and max points
    pub fn new(min: Vector2, max: Vector2) -> Self {
        Self { min, max }
    }

    /// Create a box centered at a point with given half extents
    pub fn from_center_extents(center: Vector2, extents: Vector2) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the box
    pub fn center(&self) -> Vector2 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the box
    pub fn extents(&self) -> Vector2 {
        (self.max - self.min) * 0.5
    }

    /// Check if this box contains a point (edges inclusive)
    pub fn contains_point(&self, point: Vector2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y
    }

    /// Check if this box overlaps another; touching edges count
    pub fn intersects(&self, other: &BoundingBox2) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y
    }

    /// Box enclosing the four transformed corners
    pub fn transformed(&self, position: Vector2, rotation: f32, scale: Vector2) -> Self {
        let m = Matrix3::compose(position, rotation, scale);
        let corners = [
            self.min,
            Vector2::new(self.max.x, self.min.y),
            self.max,
            Vector2::new(self.min.x, self.max.y),
        ];

        let mut min = Vector2::new(f32::INFINITY, f32::INFINITY);
        let mut max = Vector2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for corner in corners {
            let p = m.transform_point(corner);
            min = Vector2::new(min.x.min(p.x), min.y.min(p.y));
            max = Vector2::new(max.x.max(p.x), max.y.max(p.y));
        }
        Self { min, max }
    }
}

impl Default for BoundingBox2 {
    fn default() -> Self {
        Self::new(Vector2::ZERO, Vector2::ZERO)
    }
}

/// Bounding circle in 2D
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingCircle {
    /// Circle center
    pub center: Vector2,
    /// Circle radius
    pub radius: f32,
}

impl BoundingCircle {
    /// Create a new circle
    pub fn new(center: Vector2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this circle overlaps another; touching circles count
    pub fn intersects(&self, other: &BoundingCircle) -> bool {
        let reach = self.radius + other.radius;
        (self.center - other.center).length_squared() <= reach * reach
    }

    /// Circle moved by `position` and grown by the larger scale component
    ///
    /// Rotation is irrelevant for a circle about its own center.
    pub fn transformed(&self, position: Vector2, scale: Vector2) -> Self {
        Self {
            center: self.center * scale + position,
            radius: self.radius * scale.x.abs().max(scale.y.abs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_box_overlap() {
        let a = BoundingBox2::new(Vector2::new(0.0, 0.0), Vector2::new(2.0, 2.0));
        let b = BoundingBox2::new(Vector2::new(1.0, 1.0), Vector2::new(3.0, 3.0));
        let c = BoundingBox2::new(Vector2::new(2.5, 0.0), Vector2::new(4.0, 1.0));

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(b.intersects(&c));
    }

    #[test]
    fn test_box_transform_rotation_grows_extents() {
        let unit = BoundingBox2::from_center_extents(Vector2::ZERO, Vector2::new(1.0, 1.0));
        let rotated = unit.transformed(Vector2::new(5.0, 0.0), FRAC_PI_4, Vector2::ONE);

        let half_diagonal = std::f32::consts::SQRT_2;
        assert_relative_eq!(rotated.center(), Vector2::new(5.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(rotated.extents(), Vector2::new(half_diagonal, half_diagonal), epsilon = 1e-5);
    }

    #[test]
    fn test_circle_transform_and_overlap() {
        let a = BoundingCircle::new(Vector2::ZERO, 1.0).transformed(Vector2::new(0.0, 0.0), Vector2::new(2.0, 1.0));
        let b = BoundingCircle::new(Vector2::ZERO, 1.0).transformed(Vector2::new(2.9, 0.0), Vector2::ONE);
        let c = BoundingCircle::new(Vector2::ZERO, 1.0).transformed(Vector2::new(3.1, 0.0), Vector2::ONE);

        assert_relative_eq!(a.radius, 2.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
