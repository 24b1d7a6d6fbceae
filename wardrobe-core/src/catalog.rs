//! Catalog records supplied by the storefront backend

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Catalog identifier. The backend emits either strings or integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => ItemId(s),
            Raw::Int(i) => ItemId(i.to_string()),
            Raw::Float(f) => ItemId(f.to_string()),
        })
    }
}

/// One purchasable garment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default)]
    pub id: Option<ItemId>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Asset reference, relative to the asset base
    pub photo_filename: String,
    #[serde(default)]
    pub price: f64,
}

impl CatalogItem {
    /// Identifier used for cart de-duplication; falls back to the asset reference
    pub fn item_id(&self) -> ItemId {
        self.id
            .clone()
            .unwrap_or_else(|| ItemId(self.photo_filename.clone()))
    }

    /// Key under which the item's mesh is cached
    pub fn asset_key(&self) -> &str {
        &self.photo_filename
    }
}

/// Wire shape of the catalog endpoint: `{ "clothes": [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub clothes: Vec<CatalogItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_mixed_ids_and_missing_fields() {
        let json = r#"{ "clothes": [
            { "id": 7, "type": "shirt", "size": "M", "color": "red", "photo_filename": "shirt_7", "price": 12.5 },
            { "id": "abc", "type": "jeans", "photo_filename": "jeans_1" },
            { "type": "hat", "size": "S", "color": "blue", "photo_filename": "hat_3" }
        ] }"#;

        let response: CatalogResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.clothes.len(), 3);
        assert_eq!(response.clothes[0].item_id(), ItemId::from(7u64));
        assert_eq!(response.clothes[0].price, 12.5);
        assert_eq!(response.clothes[1].item_id(), ItemId::from("abc"));
        assert_eq!(response.clothes[1].price, 0.0);
        assert_eq!(response.clothes[2].item_id(), ItemId::from("hat_3"));
        assert_eq!(response.clothes[2].kind, "hat");
    }
}
