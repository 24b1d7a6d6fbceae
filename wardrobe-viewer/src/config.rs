//! Viewer configuration, loadable from JSON

use std::path::Path;

use serde::{Deserialize, Serialize};
use wardrobe_core::{Error, Result};
use wardrobe_io::HttpSourceConfig;

use crate::asset_cache::AssetCacheConfig;
use crate::scene::SceneConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window_title: String,
    /// Initial inner size in logical pixels
    pub window_size: [u32; 2],
    pub enable_multisampling: bool,
    pub vsync: bool,
    pub source: HttpSourceConfig,
    pub cache: AssetCacheConfig,
    pub scene: SceneConfig,
    /// Rig speed in world units per frame at full stick deflection
    pub controller_speed: f32,
    /// Orbit radians per dragged pixel
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "Wardrobe".to_string(),
            window_size: [1200, 800],
            enable_multisampling: true,
            vsync: true,
            source: HttpSourceConfig::default(),
            cache: AssetCacheConfig::default(),
            scene: SceneConfig::default(),
            controller_speed: 0.1,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::InvalidData(format!("viewer config: {}", e)))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        log::debug!("loaded viewer config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidData(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = ViewerConfig::from_json(
            r#"{
                "window_title": "Shop",
                "source": { "catalog_url": "http://shop/items" },
                "scene": { "layout": { "slots": 6 } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.window_title, "Shop");
        assert_eq!(config.source.catalog_url, "http://shop/items");
        assert_eq!(config.source.asset_base_url, HttpSourceConfig::default().asset_base_url);
        assert_eq!(config.scene.layout.slots, 6);
        assert_eq!(config.scene.layout.spacing, 5.0);
        assert_eq!(config.cache, AssetCacheConfig::default());
    }

    #[test]
    fn test_config_survives_json() {
        let mut config = ViewerConfig::default();
        config.cache.load_timeout_ms = None;
        let text = config.to_json().unwrap();
        assert_eq!(ViewerConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_malformed_config_is_invalid_data() {
        assert!(matches!(ViewerConfig::from_json("{ nope"), Err(Error::InvalidData(_))));
    }
}
