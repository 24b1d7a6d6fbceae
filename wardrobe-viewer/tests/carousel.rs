//! End-to-end carousel behavior against the headless backend

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use nalgebra::{Vector2, Vector3};
use tokio::runtime::Runtime;
use wardrobe_core::{
    CatalogItem, Error, FrameDesc, GeometryHandle, GpuResource, HeadlessBackend, ItemId, Material, MaterialHandle,
    Point3f, Ray, RenderBackend, SurfaceSize, TextureData, TextureHandle, TriangleMesh,
};
use wardrobe_io::{AssetFetcher, CatalogSource, IoError};
use wardrobe_viewer::{
    AssetCacheConfig, CarouselController, Cart, Direction, InteractionRouter, SceneConfig, SceneRuntime, Selection,
};

const SETTLE: Duration = Duration::from_secs(5);

/// A 2x2 quad; normalized to 8x8 by the cache
const QUAD: &str = "v -1 0 0\nv 1 0 0\nv 1 2 0\nv -1 2 0\nf 1 2 3\nf 1 3 4\n";

#[derive(Default)]
struct ScriptedSource {
    catalog: Option<Vec<CatalogItem>>,
    failing: HashSet<String>,
    held: Mutex<HashMap<String, flume::Receiver<()>>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl ScriptedSource {
    fn with_items(count: u64) -> Self {
        Self {
            catalog: Some((0..count).map(item).collect()),
            ..Self::default()
        }
    }

    fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    /// Make fetches of `key` wait until the returned sender fires
    fn hold(&self, key: &str) -> flume::Sender<()> {
        let (open, gate) = flume::unbounded();
        self.held.lock().unwrap().insert(key.to_string(), gate);
        open
    }

    fn calls(&self, key: &str) -> usize {
        self.calls.lock().unwrap().get(key).copied().unwrap_or(0)
    }
}

impl AssetFetcher for ScriptedSource {
    async fn fetch_asset(&self, key: &str) -> Result<Vec<u8>, IoError> {
        *self.calls.lock().unwrap().entry(key.to_string()).or_default() += 1;
        let gate = self.held.lock().unwrap().get(key).cloned();
        if let Some(gate) = gate {
            let _ = gate.recv_async().await;
        }
        if self.failing.contains(key) {
            return Err(IoError::FileNotFound { path: key.to_string() });
        }
        Ok(QUAD.as_bytes().to_vec())
    }
}

impl CatalogSource for ScriptedSource {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, IoError> {
        self.catalog.clone().ok_or_else(|| IoError::Http {
            message: "503 Service Unavailable".to_string(),
        })
    }
}

fn item(index: u64) -> CatalogItem {
    CatalogItem {
        id: Some(ItemId::from(index + 7)),
        kind: "shirt".to_string(),
        size: Some("M".to_string()),
        color: None,
        photo_filename: format!("item_{}", index),
        price: 10.0 + index as f64,
    }
}

type Controller = CarouselController<ScriptedSource, HeadlessBackend>;

fn controller(source: &Arc<ScriptedSource>, runtime: &Runtime) -> Controller {
    let scene = SceneRuntime::mount(HeadlessBackend::new(), SurfaceSize::new(800, 600), SceneConfig::default())
        .unwrap();
    let mut controller = CarouselController::new(
        scene,
        Arc::clone(source),
        runtime.handle().clone(),
        AssetCacheConfig::default(),
    );
    controller.request_catalog(Arc::clone(source));
    controller
}

fn occupants(controller: &Controller) -> Vec<Option<usize>> {
    (0..4)
        .map(|slot| controller.scene().occupant(slot).map(|e| e.catalog_index))
        .collect()
}

/// Ray straight through the middle of a slot, from in front of the stage
fn slot_ray(controller: &Controller, slot: usize) -> Ray {
    let position = controller.scene().layout().slot_for(slot).unwrap().position;
    Ray::new(Point3f::new(position.x, position.y + 4.0, 10.0), -Vector3::z()).unwrap()
}

#[test]
fn test_first_window_appears_together() {
    let runtime = Runtime::new().unwrap();
    let source = Arc::new(ScriptedSource::with_items(6));
    let open = source.hold("item_3");
    let mut controller = controller(&source, &runtime);

    controller.settle_blocking(Duration::from_millis(200));
    assert_eq!(controller.catalog().len(), 6);
    assert!(controller.is_loading());
    assert!(controller.scene().occupied_slots().is_empty());

    open.send(()).unwrap();
    controller.settle_blocking(SETTLE);
    assert!(!controller.is_loading());
    assert_eq!(occupants(&controller), vec![Some(0), Some(1), Some(2), Some(3)]);
    assert!(controller.cache().contains("item_3"));
}

#[test]
fn test_advance_reuses_survivors_and_evicts_the_first() {
    let runtime = Runtime::new().unwrap();
    let source = Arc::new(ScriptedSource::with_items(6));
    let mut controller = controller(&source, &runtime);
    controller.settle_blocking(SETTLE);

    let created = controller.scene().backend().created;
    let live = controller.scene().backend().live_resources();

    controller.advance(Direction::Forward).unwrap();
    controller.settle_blocking(SETTLE);

    assert_eq!(controller.window().unwrap().visible_indices(), vec![1, 2, 3, 4]);
    assert_eq!(occupants(&controller), vec![Some(1), Some(2), Some(3), Some(4)]);
    // one new object (material + geometry); the survivors were only moved
    assert_eq!(controller.scene().backend().created, created + 2);
    assert_eq!(controller.scene().backend().live_resources(), live);
    assert_eq!(controller.cache().fetches_started(), 5);

    let report = controller.unmount();
    assert_eq!(report.objects_added, 5);
    assert_eq!(report.objects_disposed, 5);
}

#[test]
fn test_advance_then_retreat_restores_the_window() {
    let runtime = Runtime::new().unwrap();
    let source = Arc::new(ScriptedSource::with_items(6));
    let mut controller = controller(&source, &runtime);
    controller.settle_blocking(SETTLE);
    let before = occupants(&controller);

    controller.advance(Direction::Forward).unwrap();
    controller.settle_blocking(SETTLE);
    controller.retreat().unwrap();
    controller.settle_blocking(SETTLE);

    assert_eq!(occupants(&controller), before);
    assert_eq!(controller.window().unwrap().start(), 0);
    // item_0 came back from the cache
    assert_eq!(source.calls("item_0"), 1);
}

#[test]
fn test_window_wraps_past_the_last_item() {
    let runtime = Runtime::new().unwrap();
    let source = Arc::new(ScriptedSource::with_items(6));
    let mut controller = controller(&source, &runtime);
    controller.settle_blocking(SETTLE);

    controller.retreat().unwrap();
    controller.settle_blocking(SETTLE);
    assert_eq!(occupants(&controller), vec![Some(5), Some(0), Some(1), Some(2)]);
}

#[test]
fn test_short_catalog_fills_leading_slots() {
    let runtime = Runtime::new().unwrap();
    let source = Arc::new(ScriptedSource::with_items(3));
    let mut controller = controller(&source, &runtime);
    controller.settle_blocking(SETTLE);
    assert_eq!(occupants(&controller), vec![Some(0), Some(1), Some(2), None]);

    controller.advance(Direction::Forward).unwrap();
    controller.settle_blocking(SETTLE);
    assert_eq!(occupants(&controller), vec![Some(1), Some(2), Some(0), None]);
    assert_eq!(controller.cache().fetches_started(), 3);
}

#[test]
fn test_failed_load_leaves_its_slot_empty() {
    let runtime = Runtime::new().unwrap();
    let source = Arc::new(ScriptedSource::with_items(6).failing("item_2"));
    let mut controller = controller(&source, &runtime);
    controller.settle_blocking(SETTLE);

    assert!(!controller.is_loading());
    assert_eq!(occupants(&controller), vec![Some(0), Some(1), None, Some(3)]);
    assert!(!controller.cache().contains("item_2"));

    assert!(controller.scene().pick(&slot_ray(&controller, 2)).is_none());
    let hit = controller.scene().pick(&slot_ray(&controller, 1)).unwrap();
    assert_eq!(hit.slot, 1);
}

#[test]
fn test_stale_arrival_is_discarded() {
    let runtime = Runtime::new().unwrap();
    let source = Arc::new(ScriptedSource::with_items(6));
    let open = source.hold("item_4");
    let mut controller = controller(&source, &runtime);
    controller.settle_blocking(SETTLE);

    controller.advance(Direction::Forward).unwrap();
    assert!(controller.is_loading());
    assert!(controller.scene().occupant(3).is_none());
    controller.retreat().unwrap();

    open.send(()).unwrap();
    controller.settle_blocking(SETTLE);

    assert!(!controller.is_loading());
    assert_eq!(occupants(&controller), vec![Some(0), Some(1), Some(2), Some(3)]);
    assert_eq!(controller.scene().occupied_slots().len(), 4);
    // The late model still lands in the cache for the next visit
    assert!(controller.cache().contains("item_4"));
}

#[test]
fn test_pending_load_follows_its_item_to_a_new_slot() {
    let runtime = Runtime::new().unwrap();
    let source = Arc::new(ScriptedSource::with_items(6));
    let open = source.hold("item_4");
    let mut controller = controller(&source, &runtime);
    controller.settle_blocking(SETTLE);

    controller.advance(Direction::Forward).unwrap();
    controller.advance(Direction::Forward).unwrap();
    open.send(()).unwrap();
    controller.settle_blocking(SETTLE);

    assert_eq!(occupants(&controller), vec![Some(2), Some(3), Some(4), Some(5)]);
    assert_eq!(source.calls("item_4"), 1);
    assert_eq!(controller.cache().fetches_started(), 6);
}

#[test]
fn test_click_adds_hovered_item_to_cart() {
    let runtime = Runtime::new().unwrap();
    let source = Arc::new(ScriptedSource::with_items(6));
    let cart = Arc::new(Mutex::new(Cart::new()));
    let mut controller = controller(&source, &runtime).with_cart(Box::new(Arc::clone(&cart)));
    controller.settle_blocking(SETTLE);

    // Project the middle of slot 0 into normalized device coordinates
    let camera = controller.scene().camera();
    let position = controller.scene().layout().slot_for(0).unwrap().position;
    let clip = camera.projection_matrix()
        * camera.view_matrix()
        * Point3f::new(position.x, position.y + 4.0, position.z).to_homogeneous();
    let ndc = Vector2::new(clip.x / clip.w, clip.y / clip.w);

    let mut router = InteractionRouter::default();
    router.pointer_moved(ndc);
    let hover = router.update(1, controller.scene_mut()).unwrap();
    assert_eq!(hover.slot, 0);
    assert_eq!(controller.scene().selection(), Some(Selection { slot: 0, part: 0 }));

    let event = router.click().unwrap();
    assert!(controller.activate(event.clone()));
    assert!(!controller.activate(event));

    let cart = cart.lock().unwrap();
    assert_eq!(cart.len(), 1);
    assert!(cart.contains(&ItemId::from(7)));
}

#[test]
fn test_catalog_failure_shows_an_empty_stage() {
    let runtime = Runtime::new().unwrap();
    let source = Arc::new(ScriptedSource::default());
    let mut controller = controller(&source, &runtime);
    controller.settle_blocking(SETTLE);

    assert!(controller.catalog_error().is_some());
    assert!(!controller.is_loading());
    assert!(controller.window().unwrap().is_empty());
    controller.advance(Direction::Forward).unwrap();
    assert!(controller.scene().occupied_slots().is_empty());
}

#[test]
fn test_unmount_disposes_every_object_ever_added() {
    let runtime = Runtime::new().unwrap();
    let source = Arc::new(ScriptedSource::with_items(6));
    let mut controller = controller(&source, &runtime);
    controller.settle_blocking(SETTLE);
    for _ in 0..2 {
        controller.advance(Direction::Forward).unwrap();
        controller.settle_blocking(SETTLE);
    }

    let report = controller.unmount();
    assert_eq!(report.objects_added, 6);
    assert_eq!(report.objects_disposed, report.objects_added);
    assert_eq!(report.dynamic.geometries, 6);
    assert_eq!(report.stage.total(), 7);
    assert_eq!(report.failures, 0);
    assert_eq!(controller.scene().backend().live_resources(), 0);
    assert!(!controller.scene().is_mounted());
}

/// Headless backend whose next geometry upload fails once `fail_next` is set
#[derive(Default)]
struct FlakyBackend {
    inner: HeadlessBackend,
    fail_next: Arc<AtomicBool>,
}

impl RenderBackend for FlakyBackend {
    fn resize(&mut self, size: SurfaceSize) {
        self.inner.resize(size)
    }

    fn create_geometry(&mut self, mesh: &TriangleMesh) -> wardrobe_core::Result<GeometryHandle> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(Error::Gpu("out of device memory".to_string()));
        }
        self.inner.create_geometry(mesh)
    }

    fn create_texture(&mut self, texture: &TextureData) -> wardrobe_core::Result<TextureHandle> {
        self.inner.create_texture(texture)
    }

    fn create_material(
        &mut self,
        material: &Material,
        map: Option<TextureHandle>,
    ) -> wardrobe_core::Result<MaterialHandle> {
        self.inner.create_material(material, map)
    }

    fn release(&mut self, resource: GpuResource) -> wardrobe_core::Result<()> {
        self.inner.release(resource)
    }

    fn render(&mut self, frame: &FrameDesc<'_>) -> wardrobe_core::Result<()> {
        self.inner.render(frame)
    }

    fn dispose(&mut self) {
        self.inner.dispose()
    }
}

fn flaky_controller(
    source: &Arc<ScriptedSource>,
    runtime: &Runtime,
) -> (CarouselController<ScriptedSource, FlakyBackend>, Arc<AtomicBool>) {
    let backend = FlakyBackend::default();
    let fail_next = Arc::clone(&backend.fail_next);
    let scene = SceneRuntime::mount(backend, SurfaceSize::new(800, 600), SceneConfig::default()).unwrap();
    let mut controller = CarouselController::new(
        scene,
        Arc::clone(source),
        runtime.handle().clone(),
        AssetCacheConfig::default(),
    );
    controller.request_catalog(Arc::clone(source));
    (controller, fail_next)
}

#[test]
fn test_failed_upload_in_first_window_leaves_only_that_slot_empty() {
    let runtime = Runtime::new().unwrap();
    let source = Arc::new(ScriptedSource::with_items(6));
    let (mut controller, fail_next) = flaky_controller(&source, &runtime);
    fail_next.store(true, Ordering::SeqCst);

    controller.settle_blocking(SETTLE);

    assert!(!controller.is_loading());
    assert_eq!(controller.scene().occupied_slots().len(), 3);
    // Stage plus one geometry and one material per shown item
    assert_eq!(controller.scene().backend().inner.live_resources(), 7 + 3 * 2);
}

#[test]
fn test_failed_upload_after_advance_does_not_stall_loading() {
    let runtime = Runtime::new().unwrap();
    let source = Arc::new(ScriptedSource::with_items(6));
    let (mut controller, fail_next) = flaky_controller(&source, &runtime);
    controller.settle_blocking(SETTLE);

    fail_next.store(true, Ordering::SeqCst);
    controller.advance(Direction::Forward).unwrap();
    controller.settle_blocking(SETTLE);

    assert!(!controller.is_loading());
    let shown: Vec<Option<usize>> = (0..4)
        .map(|slot| controller.scene().occupant(slot).map(|e| e.catalog_index))
        .collect();
    assert_eq!(shown, vec![Some(1), Some(2), Some(3), None]);

    // The decoded model stayed cached, so the next shift shows it at once
    controller.advance(Direction::Forward).unwrap();
    controller.settle_blocking(SETTLE);
    let shown: Vec<Option<usize>> = (0..4)
        .map(|slot| controller.scene().occupant(slot).map(|e| e.catalog_index))
        .collect();
    assert_eq!(shown, vec![Some(2), Some(3), Some(4), Some(5)]);
    assert_eq!(source.calls("item_4"), 1);
}
