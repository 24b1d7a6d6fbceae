//! # Wardrobe GPU
//!
//! wgpu backend for the carousel stage. [`StageRenderer`] implements
//! [`wardrobe_core::RenderBackend`], so the scene runtime never touches wgpu
//! types directly.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wardrobe_gpu::{StageRenderConfig, StageRenderer};
//!
//! async fn example(window: Arc<winit::window::Window>) -> wardrobe_core::Result<()> {
//!     let renderer = StageRenderer::new(window, StageRenderConfig::default()).await?;
//!     assert_eq!(renderer.live_resources(), 0);
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod mesh;
pub mod renderer;
pub mod shaders;

// Re-export commonly used items
pub use device::GpuContext;
pub use mesh::{mesh_to_vertices, MeshVertex};
pub use renderer::{StageRenderConfig, StageRenderer, OPENGL_TO_WGPU_MATRIX};
