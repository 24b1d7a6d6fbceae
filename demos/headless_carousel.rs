//! Headless carousel walk-through
//!
//! Drives the carousel controller against the recording backend: loads the
//! catalog from a directory, steps through every window position and prints
//! what each slot shows. No window or GPU needed.
//!
//! ```text
//! cargo run -p wardrobe-demos --bin headless_carousel -- demos/assets
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use wardrobe_core::{HeadlessBackend, SurfaceSize};
use wardrobe_io::DirectorySource;
use wardrobe_viewer::{AssetCacheConfig, CarouselController, Direction, SceneConfig, SceneRuntime};

#[derive(Parser, Debug)]
#[command(name = "headless_carousel", about = "Step through a catalog without a window")]
struct Args {
    /// Directory holding catalog.json and the assets
    #[arg(default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/assets"))]
    dir: PathBuf,

    /// Extension appended to asset keys
    #[arg(long, default_value = ".obj")]
    extension: String,

    /// Seconds to wait for each window to settle
    #[arg(long, default_value_t = 10)]
    timeout: u64,
}

fn describe(controller: &CarouselController<DirectorySource, HeadlessBackend>) -> String {
    let capacity = controller.scene().layout().capacity();
    (0..capacity)
        .map(|slot| match controller.scene().occupant(slot) {
            Some(entry) => format!("{}:{}", slot, entry.item.photo_filename),
            None => format!("{}:-", slot),
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let timeout = Duration::from_secs(args.timeout);

    let runtime = tokio::runtime::Runtime::new()?;
    let source = Arc::new(DirectorySource::new(&args.dir).with_asset_extension(args.extension));
    let scene = SceneRuntime::mount(HeadlessBackend::new(), SurfaceSize::new(1280, 720), SceneConfig::default())?;
    let mut controller =
        CarouselController::new(scene, Arc::clone(&source), runtime.handle().clone(), AssetCacheConfig::default());

    controller.request_catalog(source);
    controller.settle_blocking(timeout);
    if let Some(error) = controller.catalog_error() {
        bail!("no catalog in {}: {}", args.dir.display(), error);
    }

    let steps = controller.catalog().len();
    println!("{} items", steps);
    println!("[start 0]  {}", describe(&controller));
    for _ in 0..steps {
        controller.advance(Direction::Forward)?;
        controller.settle_blocking(timeout);
        let start = controller.window().map(|w| w.start()).unwrap_or(0);
        println!("[start {}]  {}", start, describe(&controller));
    }

    controller.scene_mut().render_frame()?;
    let report = controller.unmount();
    println!(
        "fetched {} assets; {} objects added, {} disposed; {} failed releases",
        controller.cache().fetches_started(),
        report.objects_added,
        report.objects_disposed,
        report.failures
    );
    Ok(())
}
