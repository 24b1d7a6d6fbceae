//! Asset decoding and data sources for wardrobe
//!
//! This crate turns bytes into [`Model`]s and catalog records, and provides
//! the sources the viewer pulls them from: an HTTP source backed by the
//! storefront service and a local directory source for offline use.

pub mod obj;
pub mod catalog;
pub mod source;
pub mod error;

pub use error::*;
pub use catalog::decode_catalog;
pub use source::{AssetFetcher, CatalogSource, DirectorySource, HttpSource, HttpSourceConfig};

use std::io::BufRead;
use wardrobe_core::Model;

/// Trait for decoding a model from a byte stream
pub trait ModelReader {
    fn read_model<R: BufRead>(reader: R) -> Result<Model, IoError>;
}

/// Model formats recognized by extension but not decoded
const UNSUPPORTED_FORMATS: &[&str] = &["glb", "gltf", "fbx", "stl", "ply", "dae", "3ds", "usdz"];

/// Decode fetched asset bytes as OBJ, the storefront's only output format.
///
/// Keys are upload names with their last extension stripped, so a dotted key
/// such as `IMG_2024.10.05` is still OBJ. Only a known model extension that
/// is not OBJ is rejected.
pub fn decode_model(key: &str, bytes: &[u8]) -> Result<Model, IoError> {
    let extension = std::path::Path::new(key)
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());

    match extension.as_deref() {
        Some(format) if UNSUPPORTED_FORMATS.contains(&format) => Err(IoError::InvalidFormat {
            format: format.to_string(),
        }),
        _ => obj::ObjReader::read_model(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_by_extension() {
        let src = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        assert_eq!(decode_model("tee", src).unwrap().face_count(), 1);
        assert_eq!(decode_model("tee.OBJ", src).unwrap().face_count(), 1);
        assert!(matches!(
            decode_model("tee.glb", src),
            Err(IoError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_dotted_keys_decode_as_obj() {
        let src = b"v -1 0 0\nv 1 0 0\nv 1 2 0\nv -1 2 0\nf 1 2 3\nf 1 3 4\n";
        assert_eq!(decode_model("IMG_2024.10.05", src).unwrap().face_count(), 2);
        assert_eq!(decode_model("summer.dress", src).unwrap().face_count(), 2);
    }
}
