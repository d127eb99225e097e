//! Three-component vector used by the 3D scene graph, cameras and lights

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::matrix4::Matrix4;
use super::quaternion::Quaternion;
use super::NORMALIZE_EPSILON;

/// 3D vector with value semantics
///
/// Coordinate conventions follow a right-handed Y-up frame:
/// - X+ = Right
/// - Y+ = Up
/// - Z- = Forward (into the screen)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
pub struct Vector3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vector3 {
    /// (0, 0, 0)
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// (1, 1, 1)
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    /// (0, 1, 0)
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    /// (0, -1, 0)
    pub const DOWN: Self = Self::new(0.0, -1.0, 0.0);
    /// (-1, 0, 0)
    pub const LEFT: Self = Self::new(-1.0, 0.0, 0.0);
    /// (1, 0, 0)
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    /// (0, 0, -1)
    pub const FORWARD: Self = Self::new(0.0, 0.0, -1.0);
    /// (0, 0, 1)
    pub const BACK: Self = Self::new(0.0, 0.0, 1.0);
    /// Same as [`Vector3::RIGHT`]
    pub const X_AXIS: Self = Self::RIGHT;
    /// Same as [`Vector3::UP`]
    pub const Y_AXIS: Self = Self::UP;
    /// Same as [`Vector3::FORWARD`]
    pub const Z_AXIS: Self = Self::FORWARD;

    /// Create a vector from its components
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Overwrite all components
    #[inline]
    pub fn set(&mut self, x: f32, y: f32, z: f32) {
        self.x = x;
        self.y = y;
        self.z = z;
    }

    /// Scale all components by `n`
    #[inline]
    pub fn multiply_scalar(&mut self, n: f32) {
        *self *= n;
    }

    /// Divide all components by `n`
    #[inline]
    pub fn divide_scalar(&mut self, n: f32) {
        *self /= n;
    }

    /// Negate all components in place
    #[inline]
    pub fn invert(&mut self) {
        *self = -*self;
    }

    /// Dot product
    #[inline]
    #[must_use]
    pub fn dot(self, v: Self) -> f32 {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    /// Right-handed cross product `self × v`
    #[inline]
    #[must_use]
    pub fn cross(self, v: Self) -> Self {
        Self::new(
            self.y * v.z - self.z * v.y,
            self.z * v.x - self.x * v.z,
            self.x * v.y - self.y * v.x,
        )
    }

    /// Squared Euclidean length
    #[inline]
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Euclidean length
    #[inline]
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Distance between `self` and `v`
    #[inline]
    #[must_use]
    pub fn distance_to(self, v: Self) -> f32 {
        (self - v).length()
    }

    /// Distance between two points
    #[inline]
    #[must_use]
    pub fn distance_between(a: Self, b: Self) -> f32 {
        a.distance_to(b)
    }

    /// Scale to unit length in place; no-op below a squared length of `1e-8`
    pub fn normalize(&mut self) {
        let size_squared = self.length_squared();
        if size_squared < NORMALIZE_EPSILON {
            return;
        }
        *self *= 1.0 / size_squared.sqrt();
    }

    /// Unit-length copy, or [`Vector3::ZERO`] for near-zero input
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.length_squared() < NORMALIZE_EPSILON {
            return Self::ZERO;
        }
        let mut v = self;
        v.normalize();
        v
    }

    /// Unsigned angle in radians between `self` and `v`, in `[0, π]`
    #[must_use]
    pub fn angle_between(self, v: Self) -> f32 {
        let dot = self.normalized().dot(v.normalized());
        dot.clamp(-1.0, 1.0).acos()
    }

    /// Transform as a point `(x, y, z, 1)` by `m`, with perspective divide
    pub fn apply_matrix(&mut self, m: &Matrix4) {
        let e = m.as_array();
        let (x, y, z) = (self.x, self.y, self.z);
        let w = 1.0 / (e[3] * x + e[7] * y + e[11] * z + e[15]);
        self.x = w * (e[0] * x + e[4] * y + e[8] * z + e[12]);
        self.y = w * (e[1] * x + e[5] * y + e[9] * z + e[13]);
        self.z = w * (e[2] * x + e[6] * y + e[10] * z + e[14]);
    }

    /// Transform as a direction by the upper 3×3 of `m`, ignoring translation
    pub fn apply_matrix_as_normal(&mut self, m: &Matrix4) {
        let e = m.as_array();
        let (x, y, z) = (self.x, self.y, self.z);
        self.x = e[0] * x + e[4] * y + e[8] * z;
        self.y = e[1] * x + e[5] * y + e[9] * z;
        self.z = e[2] * x + e[6] * y + e[10] * z;
    }

    /// Rotate in place by `q`
    pub fn rotate(&mut self, q: &Quaternion) {
        *self = q.rotate(*self);
    }

    /// Copy rotated by `q`
    pub fn rotated(self, q: &Quaternion) -> Self {
        q.rotate(self)
    }

    /// Take the translation column of `m`
    pub fn set_position_from_matrix(&mut self, m: &Matrix4) {
        let e = m.as_array();
        self.set(e[12], e[13], e[14]);
    }

    /// Take the basis column lengths of `m`
    pub fn set_scale_from_matrix(&mut self, m: &Matrix4) {
        let e = m.as_array();
        self.x = Self::new(e[0], e[1], e[2]).length();
        self.y = Self::new(e[4], e[5], e[6]).length();
        self.z = Self::new(e[8], e[9], e[10]).length();
    }

    /// Largest absolute component
    #[inline]
    #[must_use]
    pub fn max_abs_component(self) -> f32 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }

    /// Components as an array
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vector3> for [f32; 3] {
    fn from(v: Vector3) -> Self {
        v.to_array()
    }
}

impl Add for Vector3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul for Vector3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Div for Vector3 {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y, self.z / rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vector3 {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vector3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Vector3 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Vector3 {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl MulAssign<f32> for Vector3 {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl DivAssign<f32> for Vector3 {
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

impl AbsDiffEq for Vector3 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Vector3 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_coordinate_system_consistency() {
        // Right-handed check: X × Y = Z (towards the viewer)
        assert_relative_eq!(Vector3::RIGHT.cross(Vector3::UP), Vector3::BACK, epsilon = EPSILON);
        assert_relative_eq!(Vector3::UP.cross(Vector3::BACK), Vector3::RIGHT, epsilon = EPSILON);
        assert_relative_eq!(Vector3::BACK.cross(Vector3::RIGHT), Vector3::UP, epsilon = EPSILON);
    }

    #[test]
    fn test_normalize_near_zero_is_noop() {
        let mut v = Vector3::new(1e-5, -1e-5, 0.0);
        v.normalize();

        assert_eq!(v, Vector3::new(1e-5, -1e-5, 0.0));
        assert_eq!(v.normalized(), Vector3::ZERO);
    }

    #[test]
    fn test_angle_between() {
        assert_relative_eq!(Vector3::UP.angle_between(Vector3::UP * 3.0), 0.0, epsilon = 1e-3);
        assert_relative_eq!(Vector3::UP.angle_between(Vector3::DOWN), PI, epsilon = 1e-5);
        assert_relative_eq!(Vector3::UP.angle_between(Vector3::LEFT), FRAC_PI_2, epsilon = EPSILON);
    }

    #[test]
    fn test_apply_matrix_point_and_normal() {
        let m = Matrix4::make_translation(Vector3::new(1.0, 2.0, 3.0));

        let mut point = Vector3::new(1.0, 1.0, 1.0);
        point.apply_matrix(&m);
        assert_relative_eq!(point, Vector3::new(2.0, 3.0, 4.0), epsilon = EPSILON);

        let mut direction = Vector3::new(1.0, 1.0, 1.0);
        direction.apply_matrix_as_normal(&m);
        assert_relative_eq!(direction, Vector3::new(1.0, 1.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_rotate_matches_quaternion() {
        let q = Quaternion::from_rotation_y(FRAC_PI_2);
        let mut v = Vector3::RIGHT;
        v.rotate(&q);

        // Rotating +X by 90° about +Y gives -Z in a right-handed frame
        assert_relative_eq!(v, Vector3::FORWARD, epsilon = EPSILON);
    }

    #[test]
    fn test_scale_from_matrix() {
        let m = Matrix4::make_transform(
            Vector3::new(5.0, 0.0, 0.0),
            Quaternion::from_axis_angle(Vector3::new(1.0, 1.0, 0.0), 0.7),
            Vector3::new(2.0, 3.0, 4.0),
        );
        let mut scale = Vector3::ZERO;
        scale.set_scale_from_matrix(&m);

        assert_relative_eq!(scale, Vector3::new(2.0, 3.0, 4.0), epsilon = 1e-5);
    }
}
