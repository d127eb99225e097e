//! Two-component vector used by the 2D scene graph

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::matrix3::Matrix3;
use super::NORMALIZE_EPSILON;

/// 2D vector with value semantics
///
/// Mutating methods (`normalize`, `rotate`, `apply_matrix`, ...) change `self`
/// in place. Their past-tense counterparts (`normalized`, `rotated`) and the
/// arithmetic operators return fresh values.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
pub struct Vector2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vector2 {
    /// (0, 0)
    pub const ZERO: Self = Self::new(0.0, 0.0);
    /// (1, 1)
    pub const ONE: Self = Self::new(1.0, 1.0);
    /// (0, 1)
    pub const UP: Self = Self::new(0.0, 1.0);
    /// (0, -1)
    pub const DOWN: Self = Self::new(0.0, -1.0);
    /// (-1, 0)
    pub const LEFT: Self = Self::new(-1.0, 0.0);
    /// (1, 0)
    pub const RIGHT: Self = Self::new(1.0, 0.0);
    /// Unit X axis, same as [`Vector2::RIGHT`]
    pub const X_AXIS: Self = Self::RIGHT;
    /// Unit Y axis, same as [`Vector2::UP`]
    pub const Y_AXIS: Self = Self::UP;

    /// Create a vector from its components
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Overwrite both components
    #[inline]
    pub fn set(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Scale both components by `n`
    #[inline]
    pub fn multiply_scalar(&mut self, n: f32) {
        *self *= n;
    }

    /// Divide both components by `n`
    #[inline]
    pub fn divide_scalar(&mut self, n: f32) {
        *self /= n;
    }

    /// Negate both components in place
    #[inline]
    pub fn invert(&mut self) {
        *self = -*self;
    }

    /// Dot product
    #[inline]
    #[must_use]
    pub fn dot(self, v: Self) -> f32 {
        self.x * v.x + self.y * v.y
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

    /// Scale to unit length in place
    ///
    /// Leaves the vector untouched when its squared length is below
    /// `1e-8`, so a zero vector stays zero instead of turning into NaN.
    pub fn normalize(&mut self) {
        let size_squared = self.length_squared();
        if size_squared < NORMALIZE_EPSILON {
            return;
        }
        *self *= 1.0 / size_squared.sqrt();
    }

    /// Unit-length copy, or [`Vector2::ZERO`] for near-zero input
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

    /// Signed angle in radians that rotates `self` onto `v`
    ///
    /// Positive values are counter-clockwise. The result is wrapped to
    /// `(-π, π]` so it always describes the shorter rotation.
    #[must_use]
    pub fn angle_between_signed(self, v: Self) -> f32 {
        let a = self.normalized();
        let b = v.normalized();
        super::utils::wrap_angle(b.y.atan2(b.x) - a.y.atan2(a.x))
    }

    /// Rotate counter-clockwise by `angle` radians in place
    pub fn rotate(&mut self, angle: f32) {
        let (sin, cos) = angle.sin_cos();
        let (x, y) = (self.x, self.y);
        self.x = cos * x - sin * y;
        self.y = sin * x + cos * y;
    }

    /// Counter-clockwise rotated copy
    #[must_use]
    pub fn rotated(self, angle: f32) -> Self {
        let mut v = self;
        v.rotate(angle);
        v
    }

    /// Transform as a homogeneous point `(x, y, 1)` by `m`, with w-divide
    pub fn apply_matrix(&mut self, m: &Matrix3) {
        let e = m.as_array();
        let (x, y) = (self.x, self.y);
        let w = 1.0 / (e[2] * x + e[5] * y + e[8]);
        self.x = w * (e[0] * x + e[3] * y + e[6]);
        self.y = w * (e[1] * x + e[4] * y + e[7]);
    }

    /// Take the translation column of `m`
    pub fn set_position_from_matrix(&mut self, m: &Matrix3) {
        let e = m.as_array();
        self.x = e[6];
        self.y = e[7];
    }

    /// Take the basis column lengths of `m`
    pub fn set_scale_from_matrix(&mut self, m: &Matrix3) {
        let e = m.as_array();
        self.x = e[0].hypot(e[1]);
        self.y = e[3].hypot(e[4]);
    }

    /// Components as an array
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl From<[f32; 2]> for Vector2 {
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl Add for Vector2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul for Vector2 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Div for Vector2 {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vector2 {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Vector2 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Vector2 {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl MulAssign<f32> for Vector2 {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl DivAssign<f32> for Vector2 {
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

impl AbsDiffEq for Vector2 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon) && self.y.abs_diff_eq(&other.y, epsilon)
    }
}

impl RelativeEq for Vector2 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_normalize_zero_vector_stays_zero() {
        let mut v = Vector2::ZERO;
        v.normalize();

        assert_eq!(v, Vector2::ZERO);
        assert!(!v.x.is_nan() && !v.y.is_nan());
        assert_eq!(Vector2::new(1e-5, 0.0).normalized(), Vector2::ZERO);
    }

    #[test]
    fn test_normalize_unit_length() {
        let mut v = Vector2::new(3.0, 4.0);
        v.normalize();

        assert_relative_eq!(v, Vector2::new(0.6, 0.8), epsilon = EPSILON);
        assert_relative_eq!(v.length(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_angle_between_parallel_and_opposite() {
        let right = Vector2::new(1.0, 0.0);

        assert_relative_eq!(right.angle_between(right), 0.0, epsilon = 1e-3);
        assert_relative_eq!(right.angle_between(Vector2::new(-1.0, 0.0)), PI, epsilon = 1e-5);
        assert_relative_eq!(right.angle_between(Vector2::new(0.0, 5.0)), FRAC_PI_2, epsilon = EPSILON);
    }

    #[test]
    fn test_angle_between_is_never_nan() {
        // Nearly-parallel inputs can push the dot product past 1.0
        let a = Vector2::new(0.1, 0.1);
        let b = Vector2::new(0.100_000_01, 0.1);

        assert!(!a.angle_between(b).is_nan());
    }

    #[test]
    fn test_angle_between_signed_direction() {
        let right = Vector2::RIGHT;

        assert_relative_eq!(right.angle_between_signed(Vector2::UP), FRAC_PI_2, epsilon = EPSILON);
        assert_relative_eq!(right.angle_between_signed(Vector2::DOWN), -FRAC_PI_2, epsilon = EPSILON);

        // Crossing the atan2 seam still picks the short way round
        let a = Vector2::new(-1.0, 0.1);
        let b = Vector2::new(-1.0, -0.1);
        assert!(a.angle_between_signed(b) > 0.0);
        assert!(a.angle_between_signed(b) < 0.5);
    }

    #[test]
    fn test_rotate_counter_clockwise() {
        let v = Vector2::RIGHT.rotated(FRAC_PI_2);
        assert_relative_eq!(v, Vector2::UP, epsilon = EPSILON);
    }

    #[test]
    fn test_apply_matrix_translates_point() {
        let m = Matrix3::compose(Vector2::new(2.0, 3.0), FRAC_PI_2, Vector2::new(2.0, 2.0));
        let mut p = Vector2::new(1.0, 0.0);
        p.apply_matrix(&m);

        // scale -> (2, 0), rotate -> (0, 2), translate -> (2, 5)
        assert_relative_eq!(p, Vector2::new(2.0, 5.0), epsilon = 1e-5);
    }

    #[test]
    fn test_position_and_scale_from_matrix() {
        let m = Matrix3::compose(Vector2::new(-4.0, 7.0), 0.3, Vector2::new(2.0, 0.5));
        let mut position = Vector2::ZERO;
        let mut scale = Vector2::ZERO;
        position.set_position_from_matrix(&m);
        scale.set_scale_from_matrix(&m);

        assert_relative_eq!(position, Vector2::new(-4.0, 7.0), epsilon = EPSILON);
        assert_relative_eq!(scale, Vector2::new(2.0, 0.5), epsilon = 1e-5);
    }
}
