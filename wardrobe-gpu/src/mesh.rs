//! Vertex layout and uniform blocks for stage rendering

use bytemuck::{Pod, Zeroable};
use nalgebra::Matrix4;
use wardrobe_core::{HighlightStyle, LightRig, Material, Point3f, TriangleMesh};

/// Interleaved vertex as consumed by the mesh and outline shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    /// Vertex buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // UV
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Flatten a [`TriangleMesh`] into vertex and index arrays.
///
/// Missing normals are computed from the faces; missing texture coordinates
/// default to zero.
pub fn mesh_to_vertices(mesh: &TriangleMesh) -> (Vec<MeshVertex>, Vec<u32>) {
    let computed;
    let normals = match &mesh.normals {
        Some(normals) if normals.len() == mesh.vertices.len() => normals,
        _ => {
            let mut copy = mesh.clone();
            copy.compute_vertex_normals();
            computed = copy.normals.unwrap_or_default();
            &computed
        }
    };

    let vertices = mesh
        .vertices
        .iter()
        .enumerate()
        .map(|(i, p)| MeshVertex {
            position: [p.x, p.y, p.z],
            normal: normals.get(i).map(|n| [n.x, n.y, n.z]).unwrap_or([0.0, 1.0, 0.0]),
            uv: mesh
                .tex_coords
                .as_ref()
                .and_then(|uv| uv.get(i).copied())
                .unwrap_or([0.0, 0.0]),
        })
        .collect();

    let indices = mesh
        .faces
        .iter()
        .flat_map(|f| f.iter().map(|&i| i as u32))
        .collect();

    (vertices, indices)
}

/// Camera block, group 0 binding 0
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

impl CameraUniform {
    pub fn new(view_proj: Matrix4<f32>, eye: Point3f) -> Self {
        Self {
            view_proj: view_proj.into(),
            eye: [eye.x, eye.y, eye.z, 1.0],
        }
    }
}

/// Lighting block, group 0 binding 1. Intensities ride in `w`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightUniform {
    pub ambient: [f32; 4],
    pub directional_position: [f32; 4],
    pub directional_color: [f32; 4],
}

impl From<&LightRig> for LightUniform {
    fn from(rig: &LightRig) -> Self {
        let [ar, ag, ab] = rig.ambient_color;
        let [dr, dg, db] = rig.directional_color;
        let p = rig.directional_position;
        Self {
            ambient: [ar, ag, ab, rig.ambient_intensity],
            directional_position: [p.x, p.y, p.z, 1.0],
            directional_color: [dr, dg, db, rig.directional_intensity],
        }
    }
}

/// Material block, group 1 binding 0
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    /// metalness, roughness, has_map, unused
    pub params: [f32; 4],
}

impl MaterialUniform {
    pub fn new(material: &Material, has_map: bool) -> Self {
        let [r, g, b] = material.base_color;
        Self {
            base_color: [r, g, b, 1.0],
            params: [
                material.metalness,
                material.roughness,
                if has_map { 1.0 } else { 0.0 },
                0.0,
            ],
        }
    }
}

/// Per-draw block: transform plus outline color and thickness
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ModelUniform {
    pub transform: [[f32; 4]; 4],
    pub outline: [f32; 4],
}

impl ModelUniform {
    pub fn new(transform: Matrix4<f32>, highlight: Option<&HighlightStyle>) -> Self {
        let outline = highlight
            .map(|h| [h.color[0], h.color[1], h.color[2], h.thickness])
            .unwrap_or([0.0; 4]);
        Self {
            transform: transform.into(),
            outline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
        assert_eq!(std::mem::size_of::<ModelUniform>(), 80);
    }

    #[test]
    fn test_mesh_to_vertices_fills_missing_normals() {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let (vertices, indices) = mesh_to_vertices(&mesh);

        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(vertices.len(), 3);
        assert_relative_eq!(vertices[0].normal[2], 1.0, epsilon = 1e-6);
        assert_eq!(vertices[2].uv, [0.0, 0.0]);
    }

    #[test]
    fn test_light_uniform_packs_intensity() {
        let rig = LightRig::default();
        let uniform = LightUniform::from(&rig);
        assert_eq!(uniform.ambient[3], rig.ambient_intensity);
        assert_eq!(uniform.directional_position[..3], [10.0, 10.0, 10.0]);
    }
}
