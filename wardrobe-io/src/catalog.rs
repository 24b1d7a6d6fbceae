//! Catalog JSON decoding

use wardrobe_core::{CatalogItem, CatalogResponse};

use crate::error::IoError;

/// Decode the catalog endpoint body. Records without an asset reference
/// cannot be displayed and are dropped with a warning.
pub fn decode_catalog(bytes: &[u8]) -> Result<Vec<CatalogItem>, IoError> {
    let response: CatalogResponse = serde_json::from_slice(bytes)?;
    let total = response.clothes.len();
    let items: Vec<CatalogItem> = response
        .clothes
        .into_iter()
        .filter(|item| !item.photo_filename.trim().is_empty())
        .collect();

    if items.len() != total {
        log::warn!("dropped {} catalog records without an asset reference", total - items.len());
    }
    Ok(items)
}
