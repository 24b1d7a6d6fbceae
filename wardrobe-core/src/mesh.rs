//! Mesh data structures and functionality

use crate::point::*;
use serde::{Deserialize, Serialize};

/// A triangle mesh with vertices and faces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3f>>,
    pub tex_coords: Option<Vec<[f32; 2]>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            normals: None,
            tex_coords: None,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            normals: None,
            tex_coords: None,
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Add a vertex to the mesh
    pub fn add_vertex(&mut self, vertex: Point3f) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a face to the mesh
    pub fn add_face(&mut self, face: [usize; 3]) {
        self.faces.push(face);
    }

    /// Iterate the corner positions of every face
    pub fn triangles(&self) -> impl Iterator<Item = [Point3f; 3]> + '_ {
        self.faces
            .iter()
            .map(move |f| [self.vertices[f[0]], self.vertices[f[1]], self.vertices[f[2]]])
    }

    /// Calculate face normals
    pub fn calculate_face_normals(&self) -> Vec<Vector3f> {
        self.triangles()
            .map(|[v0, v1, v2]| {
                let normal = (v1 - v0).cross(&(v2 - v0));
                normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::y)
            })
            .collect()
    }

    /// Compute area-weighted vertex normals from the faces
    pub fn compute_vertex_normals(&mut self) {
        let mut accum = vec![Vector3f::zeros(); self.vertices.len()];
        for face in &self.faces {
            let v0 = self.vertices[face[0]];
            let v1 = self.vertices[face[1]];
            let v2 = self.vertices[face[2]];
            let weighted = (v1 - v0).cross(&(v2 - v0));
            for &index in face {
                accum[index] += weighted;
            }
        }
        let normals = accum
            .into_iter()
            .map(|n| n.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::y))
            .collect();
        self.normals = Some(normals);
    }

    /// Set vertex normals
    pub fn set_normals(&mut self, normals: Vec<Vector3f>) {
        if normals.len() == self.vertices.len() {
            self.normals = Some(normals);
        }
    }

    /// Set texture coordinates
    pub fn set_tex_coords(&mut self, tex_coords: Vec<[f32; 2]>) {
        if tex_coords.len() == self.vertices.len() {
            self.tex_coords = Some(tex_coords);
        }
    }

    /// Scale every vertex uniformly about the origin
    pub fn scale(&mut self, factor: f32) {
        for vertex in &mut self.vertices {
            vertex.coords *= factor;
        }
    }

    /// Translate every vertex
    pub fn translate(&mut self, offset: &Vector3f) {
        for vertex in &mut self.vertices {
            *vertex += offset;
        }
    }

    /// Clear the mesh
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
        self.normals = None;
        self.tex_coords = None;
    }

    /// Axis-aligned quad in the XZ plane facing +Y, centred on the origin
    pub fn plane(width: f32, depth: f32, uv_repeat: f32) -> Self {
        let (hw, hd) = (width / 2.0, depth / 2.0);
        let mut mesh = Self::from_vertices_and_faces(
            vec![
                Point3f::new(-hw, 0.0, hd),
                Point3f::new(hw, 0.0, hd),
                Point3f::new(hw, 0.0, -hd),
                Point3f::new(-hw, 0.0, -hd),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        );
        mesh.normals = Some(vec![Vector3f::y(); 4]);
        mesh.tex_coords = Some(vec![
            [0.0, uv_repeat],
            [uv_repeat, uv_repeat],
            [uv_repeat, 0.0],
            [0.0, 0.0],
        ]);
        mesh
    }

    /// Cylinder along the Y axis, centred on the origin, with capped ends
    pub fn cylinder(radius: f32, height: f32, segments: usize) -> Self {
        let segments = segments.max(3);
        let half = height / 2.0;
        let mut mesh = Self::new();
        let mut normals = Vec::new();

        for i in 0..segments {
            let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
            let (sin, cos) = angle.sin_cos();
            mesh.add_vertex(Point3f::new(radius * cos, -half, radius * sin));
            mesh.add_vertex(Point3f::new(radius * cos, half, radius * sin));
            normals.push(Vector3f::new(cos, 0.0, sin));
            normals.push(Vector3f::new(cos, 0.0, sin));
        }
        for i in 0..segments {
            let next = (i + 1) % segments;
            let (b0, t0, b1, t1) = (2 * i, 2 * i + 1, 2 * next, 2 * next + 1);
            mesh.add_face([b0, t0, t1]);
            mesh.add_face([b0, t1, b1]);
        }

        // Caps get their own vertices so the side normals stay smooth
        for (y, normal) in [(-half, -Vector3f::y()), (half, Vector3f::y())] {
            let centre = mesh.add_vertex(Point3f::new(0.0, y, 0.0));
            normals.push(normal);
            let ring_start = mesh.vertex_count();
            for i in 0..segments {
                let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
                let (sin, cos) = angle.sin_cos();
                mesh.add_vertex(Point3f::new(radius * cos, y, radius * sin));
                normals.push(normal);
            }
            for i in 0..segments {
                let a = ring_start + i;
                let b = ring_start + (i + 1) % segments;
                if y > 0.0 {
                    mesh.add_face([centre, b, a]);
                } else {
                    mesh.add_face([centre, a, b]);
                }
            }
        }

        mesh.normals = Some(normals);
        mesh
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
