//! Rotation quaternion `(x, y, z, w)`

use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::matrix4::Matrix4;
use super::vector3::Vector3;
use super::NORMALIZE_EPSILON;

/// Quaternion with vector part `(x, y, z)` and scalar part `w`
///
/// Normalization is opt-in: products of unit quaternions drift and callers
/// normalize when they need to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Quaternion {
    /// X component of the vector part
    pub x: f32,
    /// Y component of the vector part
    pub y: f32,
    /// Z component of the vector part
    pub z: f32,
    /// Scalar part
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// No rotation
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Create from raw components
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Overwrite all components
    pub fn set(&mut self, x: f32, y: f32, z: f32, w: f32) {
        *self = Self::new(x, y, z, w);
    }

    /// Rotation of `angle` radians about +X
    #[must_use]
    pub fn from_rotation_x(angle: f32) -> Self {
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(s, 0.0, 0.0, c)
    }

    /// Rotation of `angle` radians about +Y
    #[must_use]
    pub fn from_rotation_y(angle: f32) -> Self {
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(0.0, s, 0.0, c)
    }

    /// Rotation of `angle` radians about +Z
    #[must_use]
    pub fn from_rotation_z(angle: f32) -> Self {
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(0.0, 0.0, s, c)
    }

    /// Rotation of `angle` radians about `axis` (normalized here)
    #[must_use]
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        let axis = axis.normalized();
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    /// Rotation from yaw (about Y), pitch (about X) and roll (about Z)
    #[must_use]
    pub fn from_euler_angles(yaw: f32, pitch: f32, roll: f32) -> Self {
        let (sr, cr) = (roll * 0.5).sin_cos();
        let (sp, cp) = (pitch * 0.5).sin_cos();
        let (sy, cy) = (yaw * 0.5).sin_cos();

        Self::new(
            cy * sp * cr + sy * cp * sr,
            sy * cp * cr - cy * sp * sr,
            cy * cp * sr - sy * sp * cr,
            cy * cp * cr + sy * sp * sr,
        )
    }

    /// Rotation encoded in the upper 3×3 of `m`, which must be unscaled
    ///
    /// Picks the numerically largest of the four candidate terms so
    /// half-turns stay well conditioned.
    #[must_use]
    pub fn from_rotation_matrix(m: &Matrix4) -> Self {
        let e = |r: usize, c: usize| m.element(r, c);
        let (m00, m11, m22) = (e(0, 0), e(1, 1), e(2, 2));
        let trace = m00 + m11 + m22;

        if trace > 0.0 {
            let s = 0.5 / (trace + 1.0).sqrt();
            Self::new(
                (e(2, 1) - e(1, 2)) * s,
                (e(0, 2) - e(2, 0)) * s,
                (e(1, 0) - e(0, 1)) * s,
                0.25 / s,
            )
        } else if m00 > m11 && m00 > m22 {
            let s = 2.0 * (1.0 + m00 - m11 - m22).sqrt();
            Self::new(
                0.25 * s,
                (e(0, 1) + e(1, 0)) / s,
                (e(0, 2) + e(2, 0)) / s,
                (e(2, 1) - e(1, 2)) / s,
            )
        } else if m11 > m22 {
            let s = 2.0 * (1.0 + m11 - m00 - m22).sqrt();
            Self::new(
                (e(0, 1) + e(1, 0)) / s,
                0.25 * s,
                (e(1, 2) + e(2, 1)) / s,
                (e(0, 2) - e(2, 0)) / s,
            )
        } else {
            let s = 2.0 * (1.0 + m22 - m00 - m11).sqrt();
            Self::new(
                (e(0, 2) + e(2, 0)) / s,
                (e(1, 2) + e(2, 1)) / s,
                0.25 * s,
                (e(1, 0) - e(0, 1)) / s,
            )
        }
    }

    /// `self = q * self`, so `q` is applied after the current rotation
    pub fn multiply(&mut self, q: &Self) {
        *self = *q * *self;
    }

    /// Four-component dot product
    #[inline]
    #[must_use]
    pub fn dot(&self, q: &Self) -> f32 {
        self.x * q.x + self.y * q.y + self.z * q.z + self.w * q.w
    }

    /// Squared norm
    #[inline]
    #[must_use]
    pub fn length_squared(&self) -> f32 {
        self.dot(self)
    }

    /// Norm
    #[inline]
    #[must_use]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Scale to unit norm; no-op on a zero-length quaternion
    pub fn normalize(&mut self) {
        let len_sq = self.length_squared();
        if len_sq < NORMALIZE_EPSILON {
            return;
        }
        let inv = 1.0 / len_sq.sqrt();
        self.x *= inv;
        self.y *= inv;
        self.z *= inv;
        self.w *= inv;
    }

    /// Unit-norm copy
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut q = *self;
        q.normalize();
        q
    }

    /// Negated vector part
    #[must_use]
    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// `conjugate / |q|²`, or identity for a zero-length quaternion
    #[must_use]
    pub fn inverse(&self) -> Self {
        let len_sq = self.length_squared();
        if len_sq < NORMALIZE_EPSILON {
            return Self::IDENTITY;
        }
        let c = self.conjugate();
        let inv = 1.0 / len_sq;
        Self::new(c.x * inv, c.y * inv, c.z * inv, c.w * inv)
    }

    /// Invert in place
    pub fn invert(&mut self) {
        *self = self.inverse();
    }

    /// Shortest-path spherical interpolation towards `to`
    #[must_use]
    pub fn slerp(&self, to: &Self, t: f32) -> Self {
        let mut cos_half = self.dot(to);
        let mut end = *to;
        if cos_half < 0.0 {
            cos_half = -cos_half;
            end = Self::new(-to.x, -to.y, -to.z, -to.w);
        }

        // Nearly parallel: fall back to normalized lerp
        if cos_half > 0.9995 {
            let lerp = Self::new(
                self.x + (end.x - self.x) * t,
                self.y + (end.y - self.y) * t,
                self.z + (end.z - self.z) * t,
                self.w + (end.w - self.w) * t,
            );
            return lerp.normalized();
        }

        let half = cos_half.acos();
        let sin_half = half.sin();
        let a = ((1.0 - t) * half).sin() / sin_half;
        let b = (t * half).sin() / sin_half;

        Self::new(
            self.x * a + end.x * b,
            self.y * a + end.y * b,
            self.z * a + end.z * b,
            self.w * a + end.w * b,
        )
    }

    /// Rotate `v` by this quaternion
    #[must_use]
    pub fn rotate(&self, v: Vector3) -> Vector3 {
        let u = Vector3::new(self.x, self.y, self.z);
        let uv = u.cross(v);
        let uuv = u.cross(uv);
        v + uv * (2.0 * self.w) + uuv * 2.0
    }

    /// Rotation matrix, scaled by `1 / |q|²` so unnormalized input still
    /// yields a pure rotation
    #[must_use]
    pub fn to_matrix(&self) -> Matrix4 {
        let len_sq = self.length_squared();
        if len_sq < NORMALIZE_EPSILON {
            return Matrix4::IDENTITY;
        }
        let s = 2.0 / len_sq;
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);

        let (xx, yy, zz) = (x * x * s, y * y * s, z * z * s);
        let (xy, xz, yz) = (x * y * s, x * z * s, y * z * s);
        let (wx, wy, wz) = (w * x * s, w * y * s, w * z * s);

        Matrix4::from_row_major(
            1.0 - (yy + zz), xy - wz, xz + wy, 0.0,
            xy + wz, 1.0 - (xx + zz), yz - wx, 0.0,
            xz - wy, yz + wx, 1.0 - (xx + yy), 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Components as `[x, y, z, w]`
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl Mul for Quaternion {
    type Output = Self;

    /// Hamilton product: `(a * b)` applies `b` first, then `a`
    fn mul(self, b: Self) -> Self {
        let a = self;
        Self::new(
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }
}

impl Mul<Vector3> for Quaternion {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        self.rotate(v)
    }
}

impl AbsDiffEq for Quaternion {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Quaternion {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
