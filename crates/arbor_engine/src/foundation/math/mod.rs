//! Math utilities and types
//!
//! Self-contained linear algebra for the scene graph: 2D/3D vectors,
//! quaternions and column-major 3×3 / 4×4 matrices. Every type is `Copy`,
//! `#[repr(C)]` and `bytemuck::Pod` so it can be uploaded to a GPU buffer
//! without conversion.

pub mod matrix3;
pub mod matrix4;
pub mod quaternion;
pub mod vector2;
pub mod vector3;

pub use matrix3::Matrix3;
pub use matrix4::Matrix4;
pub use quaternion::Quaternion;
pub use vector2::Vector2;
pub use vector3::Vector3;

/// Squared length below which vectors and quaternions count as zero
pub(crate) const NORMALIZE_EPSILON: f32 = 1e-8;

/// Determinant magnitude below which a matrix counts as singular
pub(crate) const INVERSE_EPSILON: f32 = 1e-8;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Pi / 4
    pub const QUARTER_PI: f32 = PI * 0.25;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Wrap an angle into `(-π, π]`
    pub fn wrap_angle(angle: f32) -> f32 {
        let wrapped = (angle + constants::PI).rem_euclid(constants::TAU) - constants::PI;
        if wrapped <= -constants::PI {
            wrapped + constants::TAU
        } else {
            wrapped
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use approx::assert_relative_eq;

        #[test]
        fn test_wrap_angle() {
            assert_relative_eq!(wrap_angle(0.5), 0.5);
            assert_relative_eq!(wrap_angle(constants::PI), constants::PI, epsilon = 1e-6);
            assert_relative_eq!(wrap_angle(-constants::PI), constants::PI, epsilon = 1e-6);
            assert_relative_eq!(wrap_angle(3.0 * constants::HALF_PI), -constants::HALF_PI, epsilon = 1e-6);
        }

        #[test]
        fn test_degree_conversion() {
            assert_relative_eq!(deg_to_rad(180.0), constants::PI);
            assert_relative_eq!(rad_to_deg(constants::HALF_PI), 90.0, epsilon = 1e-4);
        }
    }
}
