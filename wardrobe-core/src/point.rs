//! Point and vector aliases

use nalgebra::{Point3, Vector2, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A 2D vector, used for normalized device coordinates and controller axes
pub type Vector2f = Vector2<f32>;

/// Axis-aligned bounds as `(min, max)` corners
pub type Bounds3f = (Point3f, Point3f);

/// Grow `bounds` so that it also covers `other`
pub fn merge_bounds(bounds: Option<Bounds3f>, other: Bounds3f) -> Bounds3f {
    match bounds {
        None => other,
        Some((min, max)) => (
            Point3f::new(min.x.min(other.0.x), min.y.min(other.0.y), min.z.min(other.0.z)),
            Point3f::new(max.x.max(other.1.x), max.y.max(other.1.y), max.z.max(other.1.z)),
        ),
    }
}
