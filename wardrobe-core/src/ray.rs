//! Rays and intersection tests used for picking

use crate::point::*;
use crate::transform::Transform3D;

const PARALLEL_EPSILON: f32 = 1e-7;
const MIN_DISTANCE: f32 = 1e-5;

/// A half-line with a normalized direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3f,
    pub direction: Vector3f,
}

impl Ray {
    /// Create a ray; the direction is normalized, and a zero direction yields `None`
    pub fn new(origin: Point3f, direction: Vector3f) -> Option<Self> {
        direction
            .try_normalize(f32::EPSILON)
            .map(|direction| Self { origin, direction })
    }

    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f32) -> Point3f {
        self.origin + self.direction * t
    }

    /// Map the ray through `transform`. Distances are not preserved under scale,
    /// so compare hits in world space via [`Ray::at`].
    pub fn transformed(&self, transform: &Transform3D) -> Option<Self> {
        let origin = transform.transform_point(&self.origin);
        let direction = transform.transform_vector(&self.direction);
        Self::new(origin, direction)
    }

    /// Möller–Trumbore ray/triangle test. Both faces count as hits.
    pub fn intersect_triangle(&self, v0: &Point3f, v1: &Point3f, v2: &Point3f) -> Option<f32> {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let h = self.direction.cross(&edge2);
        let a = edge1.dot(&h);

        if a.abs() < PARALLEL_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = self.origin - v0;
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * self.direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);
        (t > MIN_DISTANCE).then_some(t)
    }

    /// Slab test against axis-aligned bounds; returns the entry distance
    pub fn intersect_bounds(&self, bounds: &Bounds3f) -> Option<f32> {
        let (min, max) = bounds;
        let mut t_min = 0.0f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.direction[axis];
            if dir.abs() < PARALLEL_EPSILON {
                if origin < min[axis] || origin > max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let mut t0 = (min[axis] - origin) * inv;
            let mut t1 = (max[axis] - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn down_z() -> Ray {
        Ray::new(Point3f::new(0.25, 0.25, 5.0), -Vector3f::z()).unwrap()
    }

    #[test]
    fn test_triangle_hit_from_either_side() {
        let (a, b, c) = (
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        );
        let t = down_z().intersect_triangle(&a, &b, &c).unwrap();
        assert_relative_eq!(t, 5.0, epsilon = 1e-5);

        // Reversed winding still hits
        assert!(down_z().intersect_triangle(&a, &c, &b).is_some());
    }

    #[test]
    fn test_triangle_miss_and_behind() {
        let (a, b, c) = (
            Point3f::new(2.0, 2.0, 0.0),
            Point3f::new(3.0, 2.0, 0.0),
            Point3f::new(2.0, 3.0, 0.0),
        );
        assert!(down_z().intersect_triangle(&a, &b, &c).is_none());

        let away = Ray::new(Point3f::new(0.25, 0.25, 5.0), Vector3f::z()).unwrap();
        let (a, b, c) = (
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        );
        assert!(away.intersect_triangle(&a, &b, &c).is_none());
    }

    #[test]
    fn test_bounds_entry_distance() {
        let bounds = (Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));
        let t = down_z().intersect_bounds(&bounds).unwrap();
        assert_relative_eq!(t, 4.0, epsilon = 1e-5);

        let miss = Ray::new(Point3f::new(3.0, 0.0, 5.0), -Vector3f::z()).unwrap();
        assert!(miss.intersect_bounds(&bounds).is_none());
    }

    #[test]
    fn test_zero_direction_rejected() {
        assert!(Ray::new(Point3f::origin(), Vector3f::zeros()).is_none());
    }
}
