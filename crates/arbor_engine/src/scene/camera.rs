//! Camera with perspective and orthographic projections
//!
//! A camera is a 3D transform plus projection bookkeeping. It is kept out of
//! the scene arena: the application owns it and hands it to
//! [`Scene::draw`](crate::scene::Scene::draw) every frame.

use serde::{Deserialize, Serialize};

use crate::core::config::{CameraConfig, ProjectionKind};
use crate::error::{SceneError, SceneResult};
use crate::foundation::math::{utils, Matrix4, Quaternion, Vector3};
use crate::scene::hierarchy::SceneNode;
use crate::scene::transform3::Transform3;

/// Projection parameters of a camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Symmetric perspective frustum
    Perspective {
        /// Vertical field of view in radians
        fov: f32,
        /// Width / height
        aspect: f32,
        /// Near clip distance
        near: f32,
        /// Far clip distance
        far: f32,
    },
    /// Orthographic box
    Orthographic {
        /// Left extent in view space
        left: f32,
        /// Right extent in view space
        right: f32,
        /// Bottom extent in view space
        bottom: f32,
        /// Top extent in view space
        top: f32,
        /// Near clip distance
        near: f32,
        /// Far clip distance
        far: f32,
    },
}

impl Projection {
    /// Projection matrix for these parameters
    pub fn matrix(&self) -> Matrix4 {
        match *self {
            Self::Perspective { fov, aspect, near, far } => Matrix4::make_perspective(fov, aspect, near, far),
            Self::Orthographic { left, right, bottom, top, near, far } => {
                Matrix4::make_orthographic(left, right, bottom, top, near, far)
            }
        }
    }
}

/// 3D Camera for perspective and orthographic projections
///
/// The camera's world matrix places it in the scene; its view matrix is the
/// inverse of that world matrix and is refreshed by every call to
/// [`Camera::compute_world_transform`].
///
/// # Coordinate System
/// Uses a right-handed Y-up view space looking down -Z, with OpenGL clip
/// conventions (depth in `[-1, 1]`).
///
/// # Projection Changes
/// Setting projection parameters rebuilds the projection matrix immediately
/// and raises a dirty marker. Consumers that cache derived data (a uniform
/// buffer, a culling frustum) can poll [`Camera::take_projection_dirty`].
#[derive(Debug, Clone)]
pub struct Camera {
    transform: Transform3,
    projection: Projection,
    projection_matrix: Matrix4,
    view_matrix: Matrix4,
    projection_matrix_dirty: bool,
}

impl Default for Camera {
    fn default() -> Self {
        let projection = Projection::Perspective {
            fov: utils::deg_to_rad(60.0),
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        };
        Self {
            transform: Transform3::new(),
            projection,
            projection_matrix: projection.matrix(),
            view_matrix: Matrix4::IDENTITY,
            projection_matrix_dirty: true,
        }
    }
}

impl Camera {
    /// Create a perspective camera at the origin looking down -Z
    ///
    /// # Arguments
    /// * `fov` - Vertical field of view in radians, in `(0, π)`
    /// * `aspect` - Aspect ratio (width / height), positive
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// # Errors
    /// [`SceneError::InvalidArgument`] when any parameter is out of range.
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> SceneResult<Self> {
        let mut camera = Self::default();
        camera.set_perspective_camera(fov, aspect, near, far)?;
        Ok(camera)
    }

    /// Create an orthographic camera at the origin looking down -Z
    ///
    /// # Errors
    /// [`SceneError::InvalidArgument`] when an extent pair collapses.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> SceneResult<Self> {
        let mut camera = Self::default();
        camera.set_orthographic_camera(left, right, bottom, top, near, far)?;
        Ok(camera)
    }

    /// Build a camera from configuration
    ///
    /// The camera is placed at `config.position` and turned to face
    /// `config.target`.
    pub fn from_config(config: &CameraConfig) -> SceneResult<Self> {
        let mut camera = match config.projection {
            ProjectionKind::Perspective => Self::perspective(
                utils::deg_to_rad(config.fov_degrees),
                config.aspect,
                config.near,
                config.far,
            )?,
            ProjectionKind::Orthographic => {
                let half_height = config.ortho_height * 0.5;
                let half_width = half_height * config.aspect;
                Self::orthographic(-half_width, half_width, -half_height, half_height, config.near, config.far)?
            }
        };
        camera.transform.position = config.position;
        camera.look_at(config.target, Vector3::UP);
        log::info!("Camera created from config: {:?} at {:?}", config.projection, config.position);
        Ok(camera)
    }

    /// Switch to a perspective projection
    ///
    /// # Arguments
    /// * `fov` - Vertical field of view in radians, in `(0, π)`
    /// * `aspect` - Aspect ratio (width / height)
    /// * `near` - Near clip distance, positive
    /// * `far` - Far clip distance, beyond `near`
    ///
    /// # Errors
    /// [`SceneError::InvalidArgument`] when any parameter is out of range;
    /// the camera is left unchanged in that case.
    pub fn set_perspective_camera(&mut self, fov: f32, aspect: f32, near: f32, far: f32) -> SceneResult<()> {
        if !(fov > 0.0 && fov < std::f32::consts::PI) {
            return Err(SceneError::InvalidArgument(format!("field of view must be in (0, π), got {}", fov)));
        }
        if !(aspect > 0.0 && aspect.is_finite()) {
            return Err(SceneError::InvalidArgument(format!("aspect ratio must be positive, got {}", aspect)));
        }
        if !(near > 0.0) {
            return Err(SceneError::InvalidArgument(format!("near plane must be positive, got {}", near)));
        }
        if !(far > near && far.is_finite()) {
            return Err(SceneError::InvalidArgument(format!("far plane {} must lie beyond near plane {}", far, near)));
        }

        self.apply_projection(Projection::Perspective { fov, aspect, near, far });
        Ok(())
    }

    /// Switch to an orthographic projection
    ///
    /// # Errors
    /// [`SceneError::InvalidArgument`] when `left == right`,
    /// `bottom == top` or `near == far`; the camera is left unchanged.
    pub fn set_orthographic_camera(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> SceneResult<()> {
        let values = [left, right, bottom, top, near, far];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SceneError::InvalidArgument(format!("orthographic extents must be finite: {:?}", values)));
        }
        if left == right || bottom == top {
            return Err(SceneError::InvalidArgument(format!(
                "orthographic extents collapse: [{}, {}] x [{}, {}]",
                left, right, bottom, top
            )));
        }
        if near == far {
            return Err(SceneError::InvalidArgument(format!("near and far planes coincide at {}", near)));
        }

        self.apply_projection(Projection::Orthographic { left, right, bottom, top, near, far });
        Ok(())
    }

    /// Adapt the projection to a new viewport aspect ratio
    ///
    /// Perspective cameras take the new aspect directly. Orthographic cameras
    /// keep their vertical extent and centre and re-derive left/right.
    pub fn resize(&mut self, aspect: f32) -> SceneResult<()> {
        if !(aspect > 0.0 && aspect.is_finite()) {
            return Err(SceneError::InvalidArgument(format!("aspect ratio must be positive, got {}", aspect)));
        }

        let resized = match self.projection {
            Projection::Perspective { fov, near, far, .. } => Projection::Perspective { fov, aspect, near, far },
            Projection::Orthographic { left, right, bottom, top, near, far } => {
                let centre = (left + right) * 0.5;
                let half_width = (top - bottom).abs() * aspect * 0.5;
                Projection::Orthographic {
                    left: centre - half_width,
                    right: centre + half_width,
                    bottom,
                    top,
                    near,
                    far,
                }
            }
        };

        if (self.aspect_ratio() - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect_ratio(), aspect);
        }
        self.apply_projection(resized);
        Ok(())
    }

    fn apply_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.projection_matrix = projection.matrix();
        self.projection_matrix_dirty = true;
        log::trace!("Camera projection rebuilt: {:?}", projection);
    }

    /// Turn the camera so its -Z axis faces `target`
    ///
    /// Uses the camera's local position, which is its world position since
    /// cameras are roots. A target on the camera position is ignored.
    pub fn look_at(&mut self, target: Vector3, up: Vector3) {
        let eye = self.transform.position;
        if (target - eye).length_squared() < f32::EPSILON {
            return;
        }
        let facing = Matrix4::make_look_at(eye, target, up);
        self.transform.rotation = Quaternion::from_rotation_matrix(&facing).normalized();
    }

    /// Refresh the world matrix as a root node, then the view matrix
    pub fn compute_world_transform(&mut self) {
        self.transform.refresh_local_matrix();
        let world = self.transform.local_matrix();
        self.finish_world_pass(world);
    }

    /// Refresh the world matrix under `parent_world`, then the view matrix
    pub fn compute_world_transform_with_parent(&mut self, parent_world: &Matrix4) {
        self.transform.refresh_local_matrix();
        let world = *parent_world * self.transform.local_matrix();
        self.finish_world_pass(world);
    }

    fn finish_world_pass(&mut self, world: Matrix4) {
        self.transform.set_world_matrix(world);
        self.view_matrix = world.inverse();
    }

    /// Return the projection dirty marker and clear it
    pub fn take_projection_dirty(&mut self) -> bool {
        std::mem::take(&mut self.projection_matrix_dirty)
    }

    /// Whether the projection changed since the marker was last taken
    pub fn is_projection_dirty(&self) -> bool {
        self.projection_matrix_dirty
    }

    /// Camera transform
    pub fn transform(&self) -> &Transform3 {
        &self.transform
    }

    /// Mutable camera transform, for moving and turning the camera
    pub fn transform_mut(&mut self) -> &mut Transform3 {
        &mut self.transform
    }

    /// Current projection parameters
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Width / height of the view volume
    pub fn aspect_ratio(&self) -> f32 {
        match self.projection {
            Projection::Perspective { aspect, .. } => aspect,
            Projection::Orthographic { left, right, bottom, top, .. } => (right - left) / (top - bottom),
        }
    }

    /// Vertical field of view in radians; `None` for orthographic cameras
    pub fn fov(&self) -> Option<f32> {
        match self.projection {
            Projection::Perspective { fov, .. } => Some(fov),
            Projection::Orthographic { .. } => None,
        }
    }

    /// Near clip distance
    pub fn near(&self) -> f32 {
        match self.projection {
            Projection::Perspective { near, .. } | Projection::Orthographic { near, .. } => near,
        }
    }

    /// Far clip distance
    pub fn far(&self) -> f32 {
        match self.projection {
            Projection::Perspective { far, .. } | Projection::Orthographic { far, .. } => far,
        }
    }

    /// Left extent of the view volume at the near plane
    pub fn left(&self) -> f32 {
        match self.projection {
            Projection::Perspective { fov, aspect, near, .. } => -near * (fov * 0.5).tan() * aspect,
            Projection::Orthographic { left, .. } => left,
        }
    }

    /// Right extent of the view volume at the near plane
    pub fn right(&self) -> f32 {
        match self.projection {
            Projection::Perspective { fov, aspect, near, .. } => near * (fov * 0.5).tan() * aspect,
            Projection::Orthographic { right, .. } => right,
        }
    }

    /// Projection matrix
    pub fn projection_matrix(&self) -> &Matrix4 {
        &self.projection_matrix
    }

    /// View matrix from the last world pass
    pub fn view_matrix(&self) -> &Matrix4 {
        &self.view_matrix
    }

    /// `projection * view`
    pub fn view_projection_matrix(&self) -> Matrix4 {
        self.projection_matrix * self.view_matrix
    }

    /// World position from the last world pass
    pub fn world_position(&self) -> Vector3 {
        self.transform.world_position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_perspective_validation() {
        assert!(Camera::perspective(1.0, 1.5, 0.1, 100.0).is_ok());

        for (fov, aspect, near, far) in [
            (0.0, 1.0, 0.1, 10.0),
            (-1.0, 1.0, 0.1, 10.0),
            (1.0, 0.0, 0.1, 10.0),
            (1.0, 1.0, 0.0, 10.0),
            (1.0, 1.0, 1.0, 1.0),
            (1.0, 1.0, 5.0, 1.0),
            (f32::NAN, 1.0, 0.1, 10.0),
        ] {
            assert!(
                matches!(Camera::perspective(fov, aspect, near, far), Err(SceneError::InvalidArgument(_))),
                "fov={} aspect={} near={} far={}",
                fov,
                aspect,
                near,
                far
            );
        }
    }

    #[test]
    fn test_orthographic_validation() {
        assert!(Camera::orthographic(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0).is_ok());
        assert!(Camera::orthographic(1.0, 1.0, -1.0, 1.0, 0.1, 10.0).is_err());
        assert!(Camera::orthographic(-1.0, 1.0, 2.0, 2.0, 0.1, 10.0).is_err());
        assert!(Camera::orthographic(-1.0, 1.0, -1.0, 1.0, 3.0, 3.0).is_err());
    }

    #[test]
    fn test_failed_set_keeps_previous_projection() {
        let mut camera = Camera::perspective(1.0, 2.0, 0.5, 50.0).unwrap();
        let before = *camera.projection_matrix();

        assert!(camera.set_perspective_camera(1.0, -2.0, 0.5, 50.0).is_err());
        assert_eq!(*camera.projection_matrix(), before);
        assert_relative_eq!(camera.aspect_ratio(), 2.0);
    }

    #[test]
    fn test_projection_dirty_marker() {
        let mut camera = Camera::perspective(1.0, 1.0, 0.1, 10.0).unwrap();

        assert!(camera.take_projection_dirty());
        assert!(!camera.take_projection_dirty());

        camera.resize(2.0).unwrap();
        assert!(camera.is_projection_dirty());
        assert_relative_eq!(camera.aspect_ratio(), 2.0);
        assert_relative_eq!(
            *camera.projection_matrix(),
            Matrix4::make_perspective(1.0, 2.0, 0.1, 10.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_orthographic_resize_keeps_height_and_centre() {
        let mut camera = Camera::orthographic(0.0, 4.0, -1.0, 1.0, 0.1, 10.0).unwrap();
        camera.resize(4.0).unwrap();

        assert_relative_eq!(camera.left(), -2.0, epsilon = EPSILON);
        assert_relative_eq!(camera.right(), 6.0, epsilon = EPSILON);
        assert_relative_eq!(camera.aspect_ratio(), 4.0, epsilon = EPSILON);
        assert!(camera.resize(0.0).is_err());
    }

    #[test]
    fn test_view_is_inverse_of_world() {
        let mut camera = Camera::perspective(1.0, 1.0, 0.1, 10.0).unwrap();
        camera.transform_mut().position = Vector3::new(1.0, 2.0, 3.0);
        camera.transform_mut().rotation = Quaternion::from_rotation_y(0.6);
        camera.compute_world_transform();

        let world = *camera.transform().world_matrix();
        assert_relative_eq!(*camera.view_matrix(), world.inverse(), epsilon = EPSILON);
        assert_relative_eq!(*camera.view_matrix() * world, Matrix4::IDENTITY, epsilon = EPSILON);
    }

    #[test]
    fn test_view_with_parent_frame() {
        let mut camera = Camera::default();
        camera.transform_mut().position = Vector3::new(0.0, 0.0, 5.0);
        let rig = Matrix4::make_translation(Vector3::new(10.0, 0.0, 0.0));
        camera.compute_world_transform_with_parent(&rig);

        assert_relative_eq!(camera.world_position(), Vector3::new(10.0, 0.0, 5.0), epsilon = EPSILON);
        assert_relative_eq!(
            camera.view_matrix().apply_to(Vector3::new(10.0, 0.0, 0.0)),
            Vector3::new(0.0, 0.0, -5.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_look_at_centres_target_in_view() {
        let mut camera = Camera::default();
        camera.transform_mut().position = Vector3::new(4.0, 3.0, 0.0);
        let target = Vector3::new(0.0, 0.0, -2.0);
        camera.look_at(target, Vector3::UP);
        camera.compute_world_transform();

        let in_view = camera.view_matrix().apply_to(target);
        assert_relative_eq!(in_view.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(in_view.y, 0.0, epsilon = 1e-4);
        assert!(in_view.z < 0.0);
    }

    #[test]
    fn test_from_config() {
        let config = CameraConfig::new()
            .with_orthographic(6.0)
            .with_aspect(2.0)
            .with_placement(Vector3::new(0.0, 0.0, 10.0), Vector3::ZERO);
        let camera = Camera::from_config(&config).unwrap();

        assert_eq!(camera.fov(), None);
        assert_relative_eq!(camera.left(), -6.0);
        assert_relative_eq!(camera.right(), 6.0);
        assert_relative_eq!(camera.transform().position, Vector3::new(0.0, 0.0, 10.0));

        let perspective = Camera::from_config(&CameraConfig::new().with_perspective(90.0)).unwrap();
        assert_relative_eq!(perspective.fov().unwrap(), FRAC_PI_2, epsilon = EPSILON);
    }
}
