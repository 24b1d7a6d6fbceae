//! The rendering seam between the scene runtime and a graphics backend
//!
//! The scene runtime owns the object graph and decides what is drawn; a
//! [`RenderBackend`] owns GPU-resident resources and turns a [`FrameDesc`]
//! into pixels. Resources are never reclaimed implicitly: every handle a
//! backend hands out must come back through [`RenderBackend::release`].

use std::collections::HashSet;

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

use crate::material::{Material, TextureData};
use crate::mesh::TriangleMesh;
use crate::point::*;
use crate::Result;

/// Size of the surface the backend presents into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Any backend-owned resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuResource {
    Geometry(GeometryHandle),
    Material(MaterialHandle),
    Texture(TextureHandle),
}

/// Scene lighting: one ambient term plus one directional light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightRig {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub directional_position: Point3f,
    pub directional_color: [f32; 3],
    pub directional_intensity: f32,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.6,
            directional_position: Point3f::new(10.0, 10.0, 10.0),
            directional_color: [1.0, 1.0, 1.0],
            directional_intensity: 0.9,
        }
    }
}

/// Appearance of the selection-highlight pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightStyle {
    pub color: [f32; 3],
    /// Outline thickness in model units
    pub thickness: f32,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            thickness: 0.06,
        }
    }
}

/// How a frame is composited
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Composite {
    /// Base pass followed by the selection-highlight pass
    Highlighted(HighlightStyle),
    /// Base pass only; used for immersive presentation
    Direct,
}

/// One draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub model: Matrix4<f32>,
    pub highlighted: bool,
}

/// Everything a backend needs to produce one frame
#[derive(Debug, Clone)]
pub struct FrameDesc<'a> {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub eye: Point3f,
    pub lights: LightRig,
    pub clear_color: [f32; 3],
    pub composite: Composite,
    pub draws: &'a [DrawItem],
}

/// A graphics backend the scene runtime renders through
pub trait RenderBackend {
    /// Match the presentation surface to a new container size
    fn resize(&mut self, size: SurfaceSize);

    fn create_geometry(&mut self, mesh: &TriangleMesh) -> Result<GeometryHandle>;

    fn create_texture(&mut self, texture: &TextureData) -> Result<TextureHandle>;

    /// Create a material; `map` must be a live texture created by this backend
    fn create_material(&mut self, material: &Material, map: Option<TextureHandle>) -> Result<MaterialHandle>;

    /// Free a resource. Releasing an unknown handle is an error.
    fn release(&mut self, resource: GpuResource) -> Result<()>;

    fn render(&mut self, frame: &FrameDesc<'_>) -> Result<()>;

    /// Tear down the surface and anything still alive
    fn dispose(&mut self);
}

/// Statistics of what a [`HeadlessBackend`] has rendered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameRecord {
    pub draws: usize,
    pub highlighted: usize,
    pub composited: bool,
}

/// Backend without a GPU. Tracks resource lifetimes and frame submissions,
/// which is what offline runs and tests need.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u64,
    live: HashSet<GpuResource>,
    pub size: Option<SurfaceSize>,
    pub created: usize,
    pub released: usize,
    pub frames: Vec<FrameRecord>,
    pub disposed: bool,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resources created and not yet released
    pub fn live_resources(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, resource: GpuResource) -> bool {
        self.live.contains(&resource)
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.created += 1;
        self.next_id
    }
}

impl RenderBackend for HeadlessBackend {
    fn resize(&mut self, size: SurfaceSize) {
        self.size = Some(size);
    }

    fn create_geometry(&mut self, mesh: &TriangleMesh) -> Result<GeometryHandle> {
        if mesh.is_empty() {
            return Err(crate::Error::InvalidData("cannot upload an empty mesh".to_string()));
        }
        let handle = GeometryHandle(self.allocate());
        self.live.insert(GpuResource::Geometry(handle));
        Ok(handle)
    }

    fn create_texture(&mut self, texture: &TextureData) -> Result<TextureHandle> {
        if texture.pixels.len() != (texture.width * texture.height * 4) as usize {
            return Err(crate::Error::InvalidData("texture size mismatch".to_string()));
        }
        let handle = TextureHandle(self.allocate());
        self.live.insert(GpuResource::Texture(handle));
        Ok(handle)
    }

    fn create_material(&mut self, _material: &Material, map: Option<TextureHandle>) -> Result<MaterialHandle> {
        if let Some(map) = map {
            if !self.live.contains(&GpuResource::Texture(map)) {
                return Err(crate::Error::InvalidData(format!("unknown texture {:?}", map)));
            }
        }
        let handle = MaterialHandle(self.allocate());
        self.live.insert(GpuResource::Material(handle));
        Ok(handle)
    }

    fn release(&mut self, resource: GpuResource) -> Result<()> {
        if !self.live.remove(&resource) {
            return Err(crate::Error::InvalidData(format!("double release of {:?}", resource)));
        }
        self.released += 1;
        Ok(())
    }

    fn render(&mut self, frame: &FrameDesc<'_>) -> Result<()> {
        if self.disposed {
            return Err(crate::Error::Visualization("render after dispose".to_string()));
        }
        self.frames.push(FrameRecord {
            draws: frame.draws.len(),
            highlighted: frame.draws.iter().filter(|d| d.highlighted).count(),
            composited: matches!(frame.composite, Composite::Highlighted(_)),
        });
        Ok(())
    }

    fn dispose(&mut self) {
        self.live.clear();
        self.disposed = true;
    }
}
