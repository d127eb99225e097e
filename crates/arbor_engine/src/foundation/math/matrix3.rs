//! 3×3 matrix for 2D affine transforms
//!
//! Storage is column-major so the buffer can be handed to a shader unchanged.
//! Constructors taking nine scalars read them in row-major (reading) order.

use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::vector2::Vector2;
use super::INVERSE_EPSILON;

/// Column-major 3×3 matrix
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Matrix3 {
    elements: [f32; 9],
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix3 {
    /// Identity matrix
    pub const IDENTITY: Self = Self {
        elements: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Build from nine values given in row-major order
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub const fn from_row_major(
        n11: f32, n12: f32, n13: f32,
        n21: f32, n22: f32, n23: f32,
        n31: f32, n32: f32, n33: f32,
    ) -> Self {
        Self {
            elements: [n11, n21, n31, n12, n22, n32, n13, n23, n33],
        }
    }

    /// Build from a column-major buffer
    #[must_use]
    pub const fn from_column_major(elements: [f32; 9]) -> Self {
        Self { elements }
    }

    /// Overwrite from nine values in row-major order
    #[allow(clippy::too_many_arguments)]
    pub fn set_row_major(
        &mut self,
        n11: f32, n12: f32, n13: f32,
        n21: f32, n22: f32, n23: f32,
        n31: f32, n32: f32, n33: f32,
    ) {
        *self = Self::from_row_major(n11, n12, n13, n21, n22, n23, n31, n32, n33);
    }

    /// Overwrite from a column-major buffer
    pub fn set_column_major(&mut self, elements: [f32; 9]) {
        self.elements = elements;
    }

    /// Element at `row`, `col`
    #[inline]
    #[must_use]
    pub fn element(&self, row: usize, col: usize) -> f32 {
        self.elements[col * 3 + row]
    }

    /// Set the element at `row`, `col`
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.elements[col * 3 + row] = value;
    }

    /// Column-major buffer
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> &[f32; 9] {
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
    pub fn make_translation(v: Vector2) -> Self {
        Self::from_row_major(1.0, 0.0, v.x, 0.0, 1.0, v.y, 0.0, 0.0, 1.0)
    }

    /// Counter-clockwise rotation by `theta` radians
    #[must_use]
    pub fn make_rotation(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self::from_row_major(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
    }

    /// Non-uniform scale
    #[must_use]
    pub fn make_scale(v: Vector2) -> Self {
        Self::from_row_major(v.x, 0.0, 0.0, 0.0, v.y, 0.0, 0.0, 0.0, 1.0)
    }

    /// `Translation * Rotation * Scale`
    #[must_use]
    pub fn compose(position: Vector2, rotation: f32, scale: Vector2) -> Self {
        let (s, c) = rotation.sin_cos();
        Self::from_row_major(
            c * scale.x, -s * scale.y, position.x,
            s * scale.x, c * scale.y, position.y,
            0.0, 0.0, 1.0,
        )
    }

    /// Split into translation, rotation angle and scale
    ///
    /// Assumes no shear. A negative determinant is folded into the X scale.
    #[must_use]
    pub fn decompose(&self) -> (Vector2, f32, Vector2) {
        let e = &self.elements;
        let position = Vector2::new(e[6], e[7]);

        let mut sx = e[0].hypot(e[1]);
        let sy = e[3].hypot(e[4]);
        if self.determinant() < 0.0 {
            sx = -sx;
        }

        let rotation = if sx.abs() < f32::EPSILON {
            0.0
        } else {
            (e[1] / sx).atan2(e[0] / sx)
        };

        (position, rotation, Vector2::new(sx, sy))
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

    /// Determinant
    #[must_use]
    pub fn determinant(&self) -> f32 {
        let e = &self.elements;
        let (a, b, c) = (e[0], e[3], e[6]);
        let (d, f, g) = (e[1], e[4], e[7]);
        let (h, i, j) = (e[2], e[5], e[8]);
        a * (f * j - g * i) - b * (d * j - g * h) + c * (d * i - f * h)
    }

    /// Inverse, or `None` when the determinant is below `1e-8` in magnitude
    #[must_use]
    pub fn try_inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < INVERSE_EPSILON {
            return None;
        }
        let m = |r, c| self.element(r, c);
        let inv_det = 1.0 / det;

        Some(Self::from_row_major(
            (m(1, 1) * m(2, 2) - m(1, 2) * m(2, 1)) * inv_det,
            (m(0, 2) * m(2, 1) - m(0, 1) * m(2, 2)) * inv_det,
            (m(0, 1) * m(1, 2) - m(0, 2) * m(1, 1)) * inv_det,
            (m(1, 2) * m(2, 0) - m(1, 0) * m(2, 2)) * inv_det,
            (m(0, 0) * m(2, 2) - m(0, 2) * m(2, 0)) * inv_det,
            (m(0, 2) * m(1, 0) - m(0, 0) * m(1, 2)) * inv_det,
            (m(1, 0) * m(2, 1) - m(1, 1) * m(2, 0)) * inv_det,
            (m(0, 1) * m(2, 0) - m(0, 0) * m(2, 1)) * inv_det,
            (m(0, 0) * m(1, 1) - m(0, 1) * m(1, 0)) * inv_det,
        ))
    }

    /// Inverse, falling back to identity for singular matrices
    #[must_use]
    pub fn inverse(&self) -> Self {
        self.try_inverse().unwrap_or_else(|| {
            log::trace!("Matrix3::inverse on singular matrix, returning identity");
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
        let e = &self.elements;
        Self::from_row_major(e[0], e[1], e[2], e[3], e[4], e[5], e[6], e[7], e[8])
    }

    /// Transpose in place
    pub fn transpose(&mut self) {
        *self = self.transposed();
    }

    /// Transform a point, including translation
    #[must_use]
    pub fn transform_point(&self, p: Vector2) -> Vector2 {
        let mut out = p;
        out.apply_matrix(self);
        out
    }
}

impl Mul for Matrix3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = [0.0; 9];
        for col in 0..3 {
            for row in 0..3 {
                out[col * 3 + row] = (0..3)
                    .map(|k| self.element(row, k) * rhs.element(k, col))
                    .sum();
            }
        }
        Self::from_column_major(out)
    }
}

impl Mul<Vector2> for Matrix3 {
    type Output = Vector2;

    fn mul(self, rhs: Vector2) -> Vector2 {
        self.transform_point(rhs)
    }
}

impl From<[f32; 9]> for Matrix3 {
    fn from(elements: [f32; 9]) -> Self {
        Self::from_column_major(elements)
    }
}

impl AbsDiffEq for Matrix3 {
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

impl RelativeEq for Matrix3 {
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_row_major_constructor_stores_columns() {
        let m = Matrix3::from_row_major(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);

        assert_eq!(m.as_array(), &[1.0, 4.0, 7.0, 2.0, 5.0, 8.0, 3.0, 6.0, 9.0]);
        assert_eq!(m.element(0, 2), 3.0);
        assert_eq!(m.element(2, 0), 7.0);
    }

    #[test]
    fn test_multiply_premultiplies() {
        let t = Matrix3::make_translation(Vector2::new(5.0, 0.0));
        let r = Matrix3::make_rotation(FRAC_PI_2);

        let mut m = r;
        m.multiply(&t);

        // Rotate first, then translate
        assert_relative_eq!(m, t * r, epsilon = EPSILON);
        assert_relative_eq!(m * Vector2::new(1.0, 0.0), Vector2::new(5.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = Matrix3::compose(Vector2::new(3.0, -2.0), 0.4, Vector2::new(2.0, 0.5));

        assert_relative_eq!(m * m.inverse(), Matrix3::IDENTITY, epsilon = EPSILON);
        assert_relative_eq!(m.inverse() * m, Matrix3::IDENTITY, epsilon = EPSILON);
    }

    #[test]
    fn test_singular_inverse_falls_back_to_identity() {
        let m = Matrix3::make_scale(Vector2::new(0.0, 1.0));

        assert!(m.try_inverse().is_none());
        assert_eq!(m.inverse(), Matrix3::IDENTITY);
    }

    #[test]
    fn test_decompose_recovers_components() {
        let m = Matrix3::compose(Vector2::new(1.0, 2.0), -0.8, Vector2::new(3.0, 1.5));
        let (position, rotation, scale) = m.decompose();

        assert_relative_eq!(position, Vector2::new(1.0, 2.0), epsilon = EPSILON);
        assert_relative_eq!(rotation, -0.8, epsilon = EPSILON);
        assert_relative_eq!(scale, Vector2::new(3.0, 1.5), epsilon = EPSILON);
    }

    #[test]
    fn test_transpose() {
        let m = Matrix3::from_row_major(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
        let t = m.transposed();

        assert_eq!(t.element(0, 1), 4.0);
        assert_eq!(t.transposed(), m);
        assert_relative_eq!(m.determinant(), t.determinant(), epsilon = EPSILON);
    }
}
