//! Carousel viewer
//!
//! Browse a storefront catalog in 3D. Reads from the storefront HTTP service
//! by default, or from a local directory with `--dir`:
//!
//! ```text
//! cargo run -p wardrobe-demos --bin carousel_viewer -- --dir demos/assets
//! ```

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use wardrobe_io::{DirectorySource, HttpSource};
use wardrobe_viewer::{app, Cart, ViewerConfig};

#[derive(Parser, Debug)]
#[command(name = "carousel_viewer", about = "Browse a clothing catalog in 3D")]
struct Args {
    /// JSON viewer configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serve catalog.json and assets from this directory instead of HTTP
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Override the catalog endpoint
    #[arg(long)]
    catalog_url: Option<String>,

    /// Override the asset base URL
    #[arg(long)]
    asset_url: Option<String>,

    /// Extension appended to asset keys
    #[arg(long)]
    extension: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(url) = args.catalog_url {
        config.source.catalog_url = url;
    }
    if let Some(url) = args.asset_url {
        config.source.asset_base_url = url;
    }
    if let Some(extension) = &args.extension {
        config.source.asset_extension = extension.clone();
    }

    let cart = Arc::new(Mutex::new(Cart::new()));
    match args.dir {
        Some(dir) => {
            let extension = args.extension.unwrap_or_else(|| ".obj".to_string());
            log::info!("serving catalog from {}", dir.display());
            let source = Arc::new(DirectorySource::new(dir).with_asset_extension(extension));
            app::run(config, source, Box::new(Arc::clone(&cart)))?;
        }
        None => {
            log::info!("serving catalog from {}", config.source.catalog_url);
            let source = Arc::new(HttpSource::new(config.source.clone()));
            app::run(config, source, Box::new(Arc::clone(&cart)))?;
        }
    }

    if let Ok(cart) = cart.lock() {
        log::info!("cart: {} items, total {:.2}", cart.len(), cart.total());
        for item in cart.items() {
            log::info!("  {} {} ({:.2})", item.item_id(), item.kind, item.price);
        }
    }
    Ok(())
}
