//! Surface materials and texture maps

use std::sync::Arc;

/// RGBA8 texture data owned on the CPU side until uploaded
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureData {
    /// Wrap an already decoded RGBA image
    pub fn from_image(image: image::RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            pixels: image.into_raw(),
        }
    }

    /// Two-tone checkerboard, `cells` squares per side
    pub fn checker(size: u32, cells: u32, light: [u8; 3], dark: [u8; 3]) -> Self {
        let cell = (size / cells.max(1)).max(1);
        let image = image::RgbaImage::from_fn(size, size, |x, y| {
            let [r, g, b] = if ((x / cell) + (y / cell)) % 2 == 0 { light } else { dark };
            image::Rgba([r, g, b, 255])
        });
        Self::from_image(image)
    }
}

/// Physically-inspired surface description for a mesh part
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub base_color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    /// Render both faces; garment scans are often open shells
    pub double_sided: bool,
    pub map: Option<Arc<TextureData>>,
}

impl Material {
    pub fn with_color(base_color: [f32; 3]) -> Self {
        Self {
            base_color,
            ..Self::default()
        }
    }

    /// Convert a `0xRRGGBB` literal into a linear-ish float triple
    pub fn hex(rgb: u32) -> [f32; 3] {
        [
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
        ]
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: [0.8, 0.8, 0.8],
            metalness: 0.0,
            roughness: 0.5,
            double_sided: false,
            map: None,
        }
    }
}
