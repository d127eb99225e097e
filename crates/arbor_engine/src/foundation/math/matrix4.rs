//! 4×4 matrix for 3D affine and projective transforms
//!
//! Storage is column-major (OpenGL/Vulkan upload order). Projection factories
//! follow OpenGL clip conventions: right-handed view space looking down -Z,
//! depth mapped to `[-1, 1]`.

use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::quaternion::Quaternion;
use super::vector3::Vector3;
use super::INVERSE_EPSILON;

/// Column-major 4×4 matrix
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Matrix4 {
    elements: [f32; 16],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    /// Identity matrix
    pub const IDENTITY: Self = Self {
        elements: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Build from sixteen values given in row-major order
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub const fn from_row_major(
        n11: f32, n12: f32, n13: f32, n14: f32,
        n21: f32, n22: f32, n23: f32, n24: f32,
        n31: f32, n32: f32, n33: f32, n34: f32,
        n41: f32, n42: f32, n43: f32, n44: f32,
    ) -> Self {
        Self {
            elements: [
                n11, n21, n31, n41,
                n12, n22, n32, n42,
                n13, n23, n33, n43,
                n14, n24, n34, n44,
            ],
        }
    }

    /// Build from a column-major buffer
    #[must_use]
    pub const fn from_column_major(elements: [f32; 16]) -> Self {
        Self { elements }
    }

    /// Overwrite from sixteen values in row-major order
    #[allow(clippy::too_many_arguments)]
    pub fn set_row_major(
        &mut self,
        n11: f32, n12: f32, n13: f32, n14: f32,
        n21: f32, n22: f32, n23: f32, n24: f32,
        n31: f32, n32: f32, n33: f32, n34: f32,
        n41: f32, n42: f32, n43: f32, n44: f32,
    ) {
        *self = Self::from_row_major(
            n11, n12, n13, n14, n21, n22, n23, n24, n31, n32, n33, n34, n41, n42, n43, n44,
        );
    }

    /// Overwrite from a column-major buffer
    pub fn set_column_major(&mut self, elements: [f32; 16]) {
        self.elements = elements;
    }

    /// Element at `row`, `col`
    #[inline]
    #[must_use]
    pub fn element(&self, row: usize, col: usize) -> f32 {
        self.elements[col * 4 + row]
    }

    /// Set the element at `row`, `col`
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.elements[col * 4 + row] = value;
    }

    /// Column-major buffer
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> &[f32; 16] {
        &self.elements
    }

    /// Column-major buffer as a slice for upload
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.elements
    }

    /// Translation by `v`
    #[must_use]
    pub fn make_translation(v: Vector3) -> Self {
        Self::from_row_major(
            1.0, 0.0, 0.0, v.x,
            0.0, 1.0, 0.0, v.y,
            0.0, 0.0, 1.0, v.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation of `theta` radians about +X
    #[must_use]
    pub fn make_rotation_x(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self::from_row_major(
            1.0, 0.0, 0.0, 0.0,
            0.0, c, -s, 0.0,
            0.0, s, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation of `theta` radians about +Y
    #[must_use]
    pub fn make_rotation_y(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self::from_row_major(
            c, 0.0, s, 0.0,
            0.0, 1.0, 0.0, 0.0,
            -s, 0.0, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation of `theta` radians about +Z
    #[must_use]
    pub fn make_rotation_z(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self::from_row_major(
            c, -s, 0.0, 0.0,
            s, c, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation of `angle` radians about `axis` (normalized here)
    #[must_use]
    pub fn make_rotation_axis(axis: Vector3, angle: f32) -> Self {
        let a = axis.normalized();
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (a.x, a.y, a.z);

        Self::from_row_major(
            t * x * x + c, t * x * y - s * z, t * x * z + s * y, 0.0,
            t * x * y + s * z, t * y * y + c, t * y * z - s * x, 0.0,
            t * x * z - s * y, t * y * z + s * x, t * z * z + c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation matrix of `q`
    #[must_use]
    pub fn make_rotation_from_quaternion(q: &Quaternion) -> Self {
        q.to_matrix()
    }

    /// Non-uniform scale
    #[must_use]
    pub fn make_scale(v: Vector3) -> Self {
        Self::from_row_major(
            v.x, 0.0, 0.0, 0.0,
            0.0, v.y, 0.0, 0.0,
            0.0, 0.0, v.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// `Translation * Rotation * Scale`
    #[must_use]
    pub fn make_transform(position: Vector3, rotation: Quaternion, scale: Vector3) -> Self {
        let mut m = rotation.to_matrix();
        for col in 0..3 {
            let s = match col {
                0 => scale.x,
                1 => scale.y,
                _ => scale.z,
            };
            for row in 0..3 {
                m.elements[col * 4 + row] *= s;
            }
        }
        m.set_position(position);
        m
    }

    /// Alias for [`Matrix4::make_transform`]
    #[must_use]
    pub fn compose(position: Vector3, rotation: Quaternion, scale: Vector3) -> Self {
        Self::make_transform(position, rotation, scale)
    }

    /// Orthographic projection onto the box `[left, right] × [bottom, top] × [-near, -far]`
    #[must_use]
    pub fn make_orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let w = 1.0 / (right - left);
        let h = 1.0 / (top - bottom);
        let p = 1.0 / (far - near);

        Self::from_row_major(
            2.0 * w, 0.0, 0.0, -(right + left) * w,
            0.0, 2.0 * h, 0.0, -(top + bottom) * h,
            0.0, 0.0, -2.0 * p, -(far + near) * p,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Off-centre perspective frustum with the near plane at `[left, right] × [bottom, top]`
    #[must_use]
    pub fn make_frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let x = 2.0 * near / (right - left);
        let y = 2.0 * near / (top - bottom);
        let a = (right + left) / (right - left);
        let b = (top + bottom) / (top - bottom);
        let c = -(far + near) / (far - near);
        let d = -2.0 * far * near / (far - near);

        Self::from_row_major(
            x, 0.0, a, 0.0,
            0.0, y, b, 0.0,
            0.0, 0.0, c, d,
            0.0, 0.0, -1.0, 0.0,
        )
    }

    /// Symmetric perspective projection, `fov_y` in radians
    #[must_use]
    pub fn make_perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let top = near * (fov_y * 0.5).tan();
        let right = top * aspect;
        Self::make_frustum(-right, right, -top, top, near, far)
    }

    /// World transform of an observer at `eye` whose -Z axis faces `target`
    ///
    /// This is the camera's *world* matrix; its inverse is the view matrix.
    /// Degenerate inputs (eye on target, or up parallel to the view
    /// direction) fall back to a stable basis.
    #[must_use]
    pub fn make_look_at(eye: Vector3, target: Vector3, up: Vector3) -> Self {
        let mut z = eye - target;
        if z.length_squared() < INVERSE_EPSILON {
            z = Vector3::BACK;
        }
        z.normalize();

        let mut x = up.cross(z);
        if x.length_squared() < INVERSE_EPSILON {
            // up is parallel to the view direction; nudge it
            let nudged = if z.x.abs() < 0.9 { Vector3::RIGHT } else { Vector3::UP };
            x = nudged.cross(z);
        }
        x.normalize();
        let y = z.cross(x);

        Self::from_row_major(
            x.x, y.x, z.x, eye.x,
            x.y, y.y, z.y, eye.y,
            x.z, y.z, z.z, eye.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// `self = m * self`
    pub fn multiply(&mut self, m: &Self) {
        *self = *m * *self;
    }

    /// Scale every element by `s`
    pub fn multiply_scalar(&mut self, s: f32) {
        for e in &mut self.elements {
            *e *= s;
        }
    }

    /// Determinant by cofactor expansion
    #[must_use]
    pub fn determinant(&self) -> f32 {
        let c = self.cofactors();
        let e = &self.elements;
        e[0] * c[0] + e[1] * c[4] + e[2] * c[8] + e[3] * c[12]
    }

    /// Transposed cofactor matrix (adjugate), column-major
    fn cofactors(&self) -> [f32; 16] {
        let m = &self.elements;
        let mut inv = [0.0; 16];

        inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
            + m[9] * m[7] * m[14] + m[13] * m[6] * m[11] - m[13] * m[7] * m[10];
        inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
            - m[8] * m[7] * m[14] - m[12] * m[6] * m[11] + m[12] * m[7] * m[10];
        inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
            + m[8] * m[7] * m[13] + m[12] * m[5] * m[11] - m[12] * m[7] * m[9];
        inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
            - m[8] * m[6] * m[13] - m[12] * m[5] * m[10] + m[12] * m[6] * m[9];
        inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
            - m[9] * m[3] * m[14] - m[13] * m[2] * m[11] + m[13] * m[3] * m[10];
        inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
            + m[8] * m[3] * m[14] + m[12] * m[2] * m[11] - m[12] * m[3] * m[10];
        inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
            - m[8] * m[3] * m[13] - m[12] * m[1] * m[11] + m[12] * m[3] * m[9];
        inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
            + m[8] * m[2] * m[13] + m[12] * m[1] * m[10] - m[12] * m[2] * m[9];
        inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
            + m[5] * m[3] * m[14] + m[13] * m[2] * m[7] - m[13] * m[3] * m[6];
        inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
            - m[4] * m[3] * m[14] - m[12] * m[2] * m[7] + m[12] * m[3] * m[6];
        inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
            + m[4] * m[3] * m[13] + m[12] * m[1] * m[7] - m[12] * m[3] * m[5];
        inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
            - m[4] * m[2] * m[13] - m[12] * m[1] * m[6] + m[12] * m[2] * m[5];
        inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
            - m[5] * m[3] * m[10] - m[9] * m[2] * m[7] + m[9] * m[3] * m[6];
        inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
            + m[4] * m[3] * m[10] + m[8] * m[2] * m[7] - m[8] * m[3] * m[6];
        inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
            - m[4] * m[3] * m[9] - m[8] * m[1] * m[7] + m[8] * m[3] * m[5];
        inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
            + m[4] * m[2] * m[9] + m[8] * m[1] * m[6] - m[8] * m[2] * m[5];

        inv
    }

    /// Inverse, or `None` when the determinant is below `1e-8` in magnitude
    #[must_use]
    pub fn try_inverse(&self) -> Option<Self> {
        let adj = self.cofactors();
        let e = &self.elements;
        let det = e[0] * adj[0] + e[1] * adj[4] + e[2] * adj[8] + e[3] * adj[12];
        if det.abs() < INVERSE_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        Some(Self::from_column_major(adj.map(|v| v * inv_det)))
    }

    /// Inverse, falling back to identity for singular matrices
    #[must_use]
    pub fn inverse(&self) -> Self {
        self.try_inverse().unwrap_or_else(|| {
            log::trace!("Matrix4::inverse on singular matrix, returning identity");
            Self::IDENTITY
        })
    }

    /// Invert in place (identity when singular)
    pub fn invert(&mut self) {
        *self = self.inverse();
    }

    /// Transposed copy
    #[must_use]
    pub fn transposed(&self) -> Self {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = self.elements[col * 4 + row];
            }
        }
        Self::from_column_major(out)
    }

    /// Transpose in place
    pub fn transpose(&mut self) {
        *self = self.transposed();
    }

    /// Split into translation, rotation and scale
    ///
    /// Translation is the last column, scale the basis column lengths and
    /// rotation comes from the scale-divided basis. A negative determinant
    /// is folded into the X scale. Shear is not representable.
    #[must_use]
    pub fn decompose(&self) -> (Vector3, Quaternion, Vector3) {
        let e = &self.elements;
        let position = self.translation();

        let mut sx = Vector3::new(e[0], e[1], e[2]).length();
        let sy = Vector3::new(e[4], e[5], e[6]).length();
        let sz = Vector3::new(e[8], e[9], e[10]).length();
        if self.determinant() < 0.0 {
            sx = -sx;
        }

        let inv = |s: f32| if s.abs() < INVERSE_EPSILON { 0.0 } else { 1.0 / s };
        let (ix, iy, iz) = (inv(sx), inv(sy), inv(sz));

        let mut basis = *self;
        for row in 0..3 {
            basis.elements[row] *= ix;
            basis.elements[4 + row] *= iy;
            basis.elements[8 + row] *= iz;
        }
        let rotation = Quaternion::from_rotation_matrix(&basis);

        (position, rotation, Vector3::new(sx, sy, sz))
    }

    /// Translation column
    #[inline]
    #[must_use]
    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.elements[12], self.elements[13], self.elements[14])
    }

    /// Overwrite the translation column
    pub fn set_position(&mut self, v: Vector3) {
        self.elements[12] = v.x;
        self.elements[13] = v.y;
        self.elements[14] = v.z;
    }

    /// Transform a point, with perspective divide
    #[must_use]
    pub fn apply_to(&self, v: Vector3) -> Vector3 {
        let mut out = v;
        out.apply_matrix(self);
        out
    }

    /// Transform a direction by the upper 3×3
    #[must_use]
    pub fn apply_to_direction(&self, v: Vector3) -> Vector3 {
        let mut out = v;
        out.apply_matrix_as_normal(self);
        out
    }
}

impl Mul for Matrix4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let a = &self.elements;
        let b = &rhs.elements;
        let mut out = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = a[row] * b[col * 4]
                    + a[4 + row] * b[col * 4 + 1]
                    + a[8 + row] * b[col * 4 + 2]
                    + a[12 + row] * b[col * 4 + 3];
            }
        }
        Self::from_column_major(out)
    }
}

impl Mul<Vector3> for Matrix4 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Vector3 {
        self.apply_to(rhs)
    }
}

impl From<[f32; 16]> for Matrix4 {
    fn from(elements: [f32; 16]) -> Self {
        Self::from_column_major(elements)
    }
}

impl AbsDiffEq for Matrix4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.elements
            .iter()
            .zip(other.elements.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Matrix4 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.elements
            .iter()
            .zip(other.elements.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
