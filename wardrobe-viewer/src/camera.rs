//! Camera utilities for the carousel stage

use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector2, Vector3, Vector4};
use wardrobe_core::Ray;

/// Perspective camera looking at the stage.
///
/// `rig_offset` translates eye and target together; it is how controller
/// navigation walks the viewer around without touching the orbit state.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    pub rig_offset: Vector3<f32>,
}

impl Camera {
    /// Create a new camera
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
            rig_offset: Vector3::zeros(),
        }
    }

    /// Eye position in world space, rig offset included
    pub fn eye(&self) -> Point3<f32> {
        self.position + self.rig_offset
    }

    pub fn look_target(&self) -> Point3<f32> {
        self.target + self.rig_offset
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye(), &self.look_target(), &self.up)
    }

    /// Get the projection matrix (OpenGL clip conventions)
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far).into_inner()
    }

    /// Camera-to-world pose; the camera looks down its local -Z
    pub fn pose(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye(), &self.look_target(), &self.up).inverse()
    }

    /// Ray from the eye through a point in normalized device coordinates
    /// (x right, y up, both in -1..1)
    pub fn ray_from_ndc(&self, ndc: Vector2<f32>) -> Option<Ray> {
        let inverse = (self.projection_matrix() * self.view_matrix()).try_inverse()?;
        let unproject = |z: f32| {
            let p = inverse * Vector4::new(ndc.x, ndc.y, z, 1.0);
            (p.w.abs() > f32::EPSILON).then(|| Point3::new(p.x / p.w, p.y / p.w, p.z / p.w))
        };
        let near = unproject(-1.0)?;
        let far = unproject(1.0)?;
        Ray::new(near, far - near)
    }

    /// Translate the rig on the horizontal plane
    pub fn translate_rig(&mut self, delta: Vector3<f32>) {
        self.rig_offset += Vector3::new(delta.x, 0.0, delta.z);
    }

    pub fn reset(&mut self) {
        *self = Self {
            aspect_ratio: self.aspect_ratio,
            ..Self::default()
        };
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(0.0, 0.0, 20.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            75f32.to_radians(),
            16.0 / 9.0,
            0.1,
            1000.0,
        )
    }
}

/// Drag-to-orbit and wheel zoom around the camera target
#[derive(Debug, Clone)]
pub struct OrbitControls {
    enabled: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: true,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            min_distance: 2.0,
            max_distance: 200.0,
        }
    }
}

impl OrbitControls {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Stop reacting to pointer input, e.g. during an immersive session
    pub fn suspend(&mut self) {
        self.enabled = false;
    }

    pub fn resume(&mut self) {
        self.enabled = true;
    }

    /// Rotate the eye around the target by a pointer delta in pixels
    pub fn rotate(&self, camera: &mut Camera, dx: f32, dy: f32) {
        if !self.enabled {
            return;
        }
        let offset = camera.position - camera.target;
        let radius = offset.norm();
        if radius <= f32::EPSILON {
            return;
        }

        let theta = offset.x.atan2(offset.z) - dx * self.rotate_speed;
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos() - dy * self.rotate_speed;
        let phi = phi.clamp(0.01, std::f32::consts::PI - 0.01);

        camera.position = camera.target
            + Vector3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
    }

    /// Dolly toward (positive `delta`) or away from the target
    pub fn zoom(&self, camera: &mut Camera, delta: f32) {
        if !self.enabled {
            return;
        }
        let offset = camera.position - camera.target;
        let radius = offset.norm();
        if radius <= f32::EPSILON {
            return;
        }
        let new_radius = (radius * (1.0 - delta * self.zoom_speed)).clamp(self.min_distance, self.max_distance);
        camera.position = camera.target + offset * (new_radius / radius);
    }
}
