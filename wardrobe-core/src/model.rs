//! Decoded garment models and their per-scene instances

use std::sync::Arc;

use crate::catalog::CatalogItem;
use crate::material::Material;
use crate::mesh::TriangleMesh;
use crate::point::*;
use crate::ray::Ray;
use crate::traits::Drawable;
use crate::transform::Pose;

/// One leaf mesh of a model (an OBJ object or group)
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPart {
    pub name: String,
    pub mesh: TriangleMesh,
    pub material: Material,
    /// Back-reference to the catalog record this part displays
    pub owner: Option<Arc<CatalogItem>>,
}

impl MeshPart {
    pub fn new(name: impl Into<String>, mesh: TriangleMesh, material: Material) -> Self {
        Self {
            name: name.into(),
            mesh,
            material,
            owner: None,
        }
    }
}

/// A complete decoded asset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub parts: Vec<MeshPart>,
}

impl Model {
    pub fn new(parts: Vec<MeshPart>) -> Self {
        Self { parts }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|p| p.mesh.is_empty())
    }

    /// Total triangle count across parts
    pub fn face_count(&self) -> usize {
        self.parts.iter().map(|p| p.mesh.face_count()).sum()
    }

    /// Uniformly rescale so the model is `target_height` tall, centred on X/Z
    /// with its lowest point resting on Y = 0. Returns the applied scale, or
    /// `None` when the model has no vertical extent.
    pub fn normalize_height(&mut self, target_height: f32) -> Option<f32> {
        let (min, max) = self.bounding_box();
        let height = max.y - min.y;
        if self.is_empty() || height <= f32::EPSILON || !height.is_finite() {
            return None;
        }

        let scale = target_height / height;
        let anchor = Vector3f::new((min.x + max.x) / 2.0, min.y, (min.z + max.z) / 2.0);
        for part in &mut self.parts {
            part.mesh.translate(&-anchor);
            part.mesh.scale(scale);
        }
        Some(scale)
    }

    /// Deep copy with every part tagged with `owner`
    pub fn instantiate(&self, owner: &Arc<CatalogItem>) -> ModelInstance {
        let parts = self
            .parts
            .iter()
            .map(|part| MeshPart {
                owner: Some(Arc::clone(owner)),
                ..part.clone()
            })
            .collect();
        ModelInstance {
            parts,
            pose: Pose::default(),
        }
    }
}

impl Drawable for Model {
    fn bounding_box(&self) -> Bounds3f {
        self.parts
            .iter()
            .filter(|p| !p.mesh.vertices.is_empty())
            .fold(None, |acc, p| Some(merge_bounds(acc, p.mesh.bounding_box())))
            .unwrap_or((Point3f::origin(), Point3f::origin()))
    }
}

/// A model placed in a scene. Owns its geometry and its pose.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInstance {
    pub parts: Vec<MeshPart>,
    pub pose: Pose,
}

/// Nearest hit of a ray against an instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartHit {
    pub part: usize,
    /// World-space distance from the ray origin
    pub distance: f32,
}

impl ModelInstance {
    /// The catalog record this instance displays, if tagged
    pub fn owner(&self) -> Option<&Arc<CatalogItem>> {
        self.parts.iter().find_map(|p| p.owner.as_ref())
    }

    /// Nearest intersection with any part that carries an owner
    pub fn intersect(&self, ray: &Ray) -> Option<PartHit> {
        let to_world = self.pose.to_transform();
        let local_ray = ray.transformed(&to_world.inverse()?)?;

        let mut best: Option<PartHit> = None;
        for (index, part) in self.parts.iter().enumerate() {
            if part.owner.is_none() || part.mesh.is_empty() {
                continue;
            }
            if local_ray.intersect_bounds(&part.mesh.bounding_box()).is_none() {
                continue;
            }
            let nearest = part
                .mesh
                .triangles()
                .filter_map(|[a, b, c]| local_ray.intersect_triangle(&a, &b, &c))
                .fold(None, |acc: Option<f32>, t| Some(acc.map_or(t, |m| m.min(t))));
            if let Some(t) = nearest {
                let world_hit = to_world.transform_point(&local_ray.at(t));
                let distance = (world_hit - ray.origin).norm();
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(PartHit { part: index, distance });
                }
            }
        }
        best
    }
}
