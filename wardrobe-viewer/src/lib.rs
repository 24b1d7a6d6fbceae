//! Carousel viewer for a clothing catalog
//!
//! Shows a window of catalog items on a lit stage, a few at a time, and lets
//! the user step through the catalog, orbit the camera and add the item under
//! the pointer to a cart:
//! - [`CarouselController`]: catalog, window shifts and asset loading
//! - [`SceneRuntime`]: stage, visible group, selection and disposal
//! - [`InteractionRouter`]: pointer and controller picking
//! - [`app::run`]: the desktop window loop

pub mod app;
pub mod asset_cache;
pub mod camera;
pub mod carousel;
pub mod cart;
pub mod config;
pub mod controller;
pub mod interaction;
pub mod scene;
pub mod stage;

pub use asset_cache::{prepare_model, AssetCache, AssetCacheConfig, Resolution, Settled, SlotTicket};
pub use camera::{Camera, OrbitControls};
pub use carousel::{CarouselWindow, Direction};
pub use cart::{Cart, CartSink};
pub use config::ViewerConfig;
pub use controller::CarouselController;
pub use interaction::{Hover, InputMode, InteractionEvent, InteractionRouter, SessionEvent};
pub use scene::{
    DisposalReport, Listener, PickHit, PresentationMode, RegistryKey, ReleaseCounts, ResourceRegistry, SceneConfig,
    SceneRuntime, Selection, VisibleEntry,
};
pub use stage::{stage_props, StageLayout, StageLayoutConfig, StageProp, StageSlot};
