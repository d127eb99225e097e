//! Lighting system
//!
//! A [`Light`] is a payload carried by a 3D scene node. Its position and
//! visibility come from the node; the light itself only stores its kind and
//! its three intensity terms.

use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::foundation::math::Vector3;

/// Light types
///
/// The discriminant is the numeric code written into the flattened light
/// arrays, so shaders can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LightType {
    /// Uniform light with no position or direction
    Ambient = 0,
    /// Directional light (like sunlight)
    Directional = 1,
    /// Point light (like a lightbulb)
    Point = 2,
    /// Spot light (like a flashlight)
    Spot = 3,
}

impl LightType {
    /// Numeric code used by the render backend
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Code as written into the `f32` type array
    pub fn as_f32(self) -> f32 {
        f32::from(self.code())
    }
}

impl TryFrom<u8> for LightType {
    type Error = SceneError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Ambient),
            1 => Ok(Self::Directional),
            2 => Ok(Self::Point),
            3 => Ok(Self::Spot),
            other => Err(SceneError::InvalidArgument(format!("unknown light type code {}", other))),
        }
    }
}

/// Light source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Light type
    pub light_type: LightType,
    /// Ambient term (RGB)
    pub ambient_intensity: Vector3,
    /// Diffuse term (RGB)
    pub diffuse_intensity: Vector3,
    /// Specular term (RGB)
    pub specular_intensity: Vector3,
}

impl Light {
    /// Create a light with explicit intensities
    pub fn new(light_type: LightType, ambient: Vector3, diffuse: Vector3, specular: Vector3) -> Self {
        Self {
            light_type,
            ambient_intensity: ambient,
            diffuse_intensity: diffuse,
            specular_intensity: specular,
        }
    }

    /// Create an ambient light
    pub fn ambient(color: Vector3) -> Self {
        Self::new(LightType::Ambient, color, Vector3::ZERO, Vector3::ZERO)
    }

    /// Create a directional light
    pub fn directional(color: Vector3, intensity: f32) -> Self {
        let c = color * intensity;
        Self::new(LightType::Directional, Vector3::ZERO, c, c)
    }

    /// Create a point light
    pub fn point(color: Vector3, intensity: f32) -> Self {
        let c = color * intensity;
        Self::new(LightType::Point, Vector3::ZERO, c, c)
    }

    /// Create a spot light
    pub fn spot(color: Vector3, intensity: f32) -> Self {
        let c = color * intensity;
        Self::new(LightType::Spot, Vector3::ZERO, c, c)
    }

    /// Set the ambient term
    pub fn with_ambient(mut self, ambient: Vector3) -> Self {
        self.ambient_intensity = ambient;
        self
    }

    /// Set the diffuse term
    pub fn with_diffuse(mut self, diffuse: Vector3) -> Self {
        self.diffuse_intensity = diffuse;
        self
    }

    /// Set the specular term
    pub fn with_specular(mut self, specular: Vector3) -> Self {
        self.specular_intensity = specular;
        self
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::point(Vector3::ONE, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes() {
        assert_eq!(LightType::Ambient.code(), 0);
        assert_eq!(LightType::Directional.code(), 1);
        assert_eq!(LightType::Point.code(), 2);
        assert_eq!(LightType::Spot.as_f32(), 3.0);

        for code in 0..=3u8 {
            assert_eq!(LightType::try_from(code).map(LightType::code), Ok(code));
        }
        assert!(matches!(LightType::try_from(4), Err(SceneError::InvalidArgument(_))));
    }

    #[test]
    fn test_constructors_scale_color() {
        let light = Light::point(Vector3::new(1.0, 0.5, 0.0), 2.0);

        assert_eq!(light.light_type, LightType::Point);
        assert_eq!(light.ambient_intensity, Vector3::ZERO);
        assert_eq!(light.diffuse_intensity, Vector3::new(2.0, 1.0, 0.0));
        assert_eq!(light.specular_intensity, Vector3::new(2.0, 1.0, 0.0));
    }
}
