//! Core data structures and traits for wardrobe
//!
//! This crate provides the fundamental types of the carousel viewer:
//! meshes, materials, decoded models and their instances, rays for picking,
//! catalog records, the error taxonomy and the rendering seam.

pub mod point;
pub mod mesh;
pub mod material;
pub mod model;
pub mod traits;
pub mod transform;
pub mod ray;
pub mod catalog;
pub mod render;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use material::*;
pub use model::*;
pub use traits::*;
pub use transform::*;
pub use ray::*;
pub use catalog::*;
pub use render::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Isometry3, Matrix4, Point3, UnitQuaternion, Vector2, Vector3};
