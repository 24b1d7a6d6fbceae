//! Catalog and asset sources
//!
//! The viewer treats the storefront as two collaborators: a catalog endpoint
//! returning `{ "clothes": [...] }` and a static file server hosting the mesh
//! referenced by each record's `photo_filename`.

use std::future::Future;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use wardrobe_core::CatalogItem;

use crate::catalog::decode_catalog;
use crate::error::IoError;

/// Fetches raw asset bytes by key. Implementations must be shareable across
/// the loader tasks.
pub trait AssetFetcher: Send + Sync + 'static {
    fn fetch_asset(&self, key: &str) -> impl Future<Output = Result<Vec<u8>, IoError>> + Send;
}

/// Fetches the catalog once per viewer mount
pub trait CatalogSource: Send + Sync + 'static {
    fn fetch_catalog(&self) -> impl Future<Output = Result<Vec<CatalogItem>, IoError>> + Send;
}

/// Endpoints of the storefront service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSourceConfig {
    pub catalog_url: String,
    pub asset_base_url: String,
    /// Appended to every asset key, e.g. ".obj"
    pub asset_extension: String,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            catalog_url: "http://localhost:5000/getClothes".to_string(),
            asset_base_url: "http://127.0.0.1:5000/3Doutput".to_string(),
            asset_extension: String::new(),
        }
    }
}

/// Storefront source over HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    config: HttpSourceConfig,
}

impl HttpSource {
    pub fn new(config: HttpSourceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn asset_url(&self, key: &str) -> String {
        format!(
            "{}/{}{}",
            self.config.asset_base_url.trim_end_matches('/'),
            key.trim_start_matches('/'),
            self.config.asset_extension
        )
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, IoError> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

impl AssetFetcher for HttpSource {
    async fn fetch_asset(&self, key: &str) -> Result<Vec<u8>, IoError> {
        let url = self.asset_url(key);
        self.get_bytes(&url).await
    }
}

impl CatalogSource for HttpSource {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, IoError> {
        let body = self.get_bytes(&self.config.catalog_url).await?;
        decode_catalog(&body)
    }
}

/// Offline source: `catalog.json` plus asset files in one directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    asset_extension: String,
}

impl DirectorySource {
    pub const CATALOG_FILE: &'static str = "catalog.json";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            asset_extension: String::new(),
        }
    }

    pub fn with_asset_extension(mut self, extension: impl Into<String>) -> Self {
        self.asset_extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read(&self, path: PathBuf) -> Result<Vec<u8>, IoError> {
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(IoError::FileNotFound {
                path: path.display().to_string(),
            }),
            Err(e) => Err(IoError::Io(e)),
        }
    }
}

impl AssetFetcher for DirectorySource {
    async fn fetch_asset(&self, key: &str) -> Result<Vec<u8>, IoError> {
        let path = self.root.join(format!("{}{}", key, self.asset_extension));
        self.read(path).await
    }
}

impl CatalogSource for DirectorySource {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, IoError> {
        let body = self.read(self.root.join(Self::CATALOG_FILE)).await?;
        decode_catalog(&body)
    }
}
