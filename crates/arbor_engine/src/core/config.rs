//! # Engine Configuration
//!
//! Configuration structures for the engine core, the default camera and the
//! application as a whole. Every structure has sensible defaults, builder
//! style `with_*` setters and a `validate()` pass, and the top-level
//! [`ApplicationConfig`] can be loaded from TOML or RON through [`Config`].

use serde::{Serialize, Deserialize};

use crate::foundation::math::Vector3;

pub use crate::config::{Config, ConfigError, ConfigFormat};

/// # Engine Configuration
///
/// Core engine behavior: logging and how many frames a headless driver runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level for the engine (an `env_logger` filter string)
    pub log_level: String,
    /// Number of frames a headless driver should draw
    pub frames: u32,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            frames: 3,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the number of frames to draw
    pub fn with_frames(mut self, frames: u32) -> Self {
        self.frames = frames;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("Log level cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Projection family of a configured camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionKind {
    /// Perspective frustum driven by `fov_degrees`
    Perspective,
    /// Orthographic box driven by `ortho_height`
    Orthographic,
}

/// # Camera Configuration
///
/// Initial projection parameters and placement of a camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Projection family
    pub projection: ProjectionKind,
    /// Vertical field of view in degrees (perspective only)
    pub fov_degrees: f32,
    /// Width / height
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
    /// Visible height of the view volume (orthographic only)
    pub ortho_height: f32,
    /// Initial world position
    pub position: Vector3,
    /// Point the camera initially looks at
    pub target: Vector3,
}

impl CameraConfig {
    /// Perspective camera at `(0, 0, 10)` looking at the origin
    pub fn new() -> Self {
        Self {
            projection: ProjectionKind::Perspective,
            fov_degrees: 60.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
            ortho_height: 10.0,
            position: Vector3::new(0.0, 0.0, 10.0),
            target: Vector3::ZERO,
        }
    }

    /// Switch to a perspective projection
    pub fn with_perspective(mut self, fov_degrees: f32) -> Self {
        self.projection = ProjectionKind::Perspective;
        self.fov_degrees = fov_degrees;
        self
    }

    /// Switch to an orthographic projection
    pub fn with_orthographic(mut self, height: f32) -> Self {
        self.projection = ProjectionKind::Orthographic;
        self.ortho_height = height;
        self
    }

    /// Set aspect ratio
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    /// Set clip planes
    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Set initial placement
    pub fn with_placement(mut self, position: Vector3, target: Vector3) -> Self {
        self.position = position;
        self.target = target;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.aspect > 0.0) {
            return Err(ConfigError::Invalid(format!("Aspect ratio must be positive, got {}", self.aspect)));
        }
        if self.near == self.far {
            return Err(ConfigError::Invalid("Near and far planes must differ".to_string()));
        }
        match self.projection {
            ProjectionKind::Perspective => {
                if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
                    return Err(ConfigError::Invalid(format!(
                        "Field of view must be in (0, 180) degrees, got {}",
                        self.fov_degrees
                    )));
                }
                if !(self.near > 0.0) {
                    return Err(ConfigError::Invalid("Perspective near plane must be positive".to_string()));
                }
            }
            ProjectionKind::Orthographic => {
                if !(self.ortho_height > 0.0) {
                    return Err(ConfigError::Invalid("Orthographic height must be positive".to_string()));
                }
            }
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
/// This is the main configuration structure applications should use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Application name, used in log output
    pub name: String,
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Default camera configuration
    pub camera: CameraConfig,
}

impl ApplicationConfig {
    /// Create a new application configuration with defaults
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            name: app_name.into(),
            engine: EngineConfig::default(),
            camera: CameraConfig::default(),
        }
    }

    /// Replace the engine configuration
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Replace the camera configuration
    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::Invalid("Application name cannot be empty".to_string()));
        }
        self.engine.validate()?;
        self.camera.validate()?;
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self::new("Arbor Application")
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ApplicationConfig {
        ApplicationConfig::new("config-test")
            .with_engine(EngineConfig::new().with_log_level("debug").with_frames(7))
            .with_camera(
                CameraConfig::new()
                    .with_orthographic(12.0)
                    .with_aspect(1.5)
                    .with_clip_planes(0.5, 40.0)
                    .with_placement(Vector3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 1.0, 0.0)),
            )
    }

    #[test]
    fn test_defaults_validate() {
        assert!(ApplicationConfig::default().validate().is_ok());
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_camera() {
        let config = ApplicationConfig::default().with_camera(CameraConfig::new().with_perspective(0.0));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = ApplicationConfig::default().with_camera(CameraConfig::new().with_clip_planes(5.0, 5.0));
        assert!(config.validate().is_err());

        let config = ApplicationConfig::default().with_camera(CameraConfig::new().with_aspect(-1.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trip_through_toml_and_ron() {
        let config = sample();

        for format in [ConfigFormat::Toml, ConfigFormat::Ron] {
            let text = config.to_string_as(format).expect("serialize");
            let parsed = ApplicationConfig::from_str_as(&text, format).expect("parse");
            assert_eq!(parsed, config, "{:?} round trip", format);
        }
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir();
        let config = sample();

        for ext in ["toml", "ron"] {
            let path = dir.join(format!("arbor_config_test_{}.{}", std::process::id(), ext));
            config.save_to_file(&path).expect("save");
            let loaded = ApplicationConfig::load_from_file(&path).expect("load");
            let _ = std::fs::remove_file(&path);

            assert_eq!(loaded, config);
        }
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let text = "name = \"partial\"\n[engine]\nframes = 2\n";
        let config = ApplicationConfig::from_str_as(text, ConfigFormat::Toml).expect("parse");

        assert_eq!(config.name, "partial");
        assert_eq!(config.engine.frames, 2);
        assert_eq!(config.engine.log_level, "info");
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = ApplicationConfig::load_from_file("settings.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
