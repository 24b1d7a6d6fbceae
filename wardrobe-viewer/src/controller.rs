//! Carousel orchestration: catalog, window, cache and scene
//!
//! The controller never blocks in [`CarouselController::poll`]; fetches run
//! on the tokio runtime and settle through channels drained once per frame.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use wardrobe_core::{CatalogItem, Error, RenderBackend, Result};
use wardrobe_io::{AssetFetcher, CatalogSource, IoError};

use crate::asset_cache::{AssetCache, AssetCacheConfig, Resolution, Settled, SlotTicket};
use crate::carousel::{CarouselWindow, Direction};
use crate::cart::CartSink;
use crate::interaction::InteractionEvent;
use crate::scene::{DisposalReport, SceneRuntime, VisibleEntry};

type CatalogResult = std::result::Result<Vec<CatalogItem>, IoError>;

/// Entries of the first window, applied together once every load settles
struct InitialBatch {
    generation: u64,
    ready: Vec<VisibleEntry>,
}

pub struct CarouselController<F: AssetFetcher, B: RenderBackend> {
    scene: SceneRuntime<B>,
    cache: AssetCache<F>,
    runtime: Handle,
    catalog: Vec<Arc<CatalogItem>>,
    window: Option<CarouselWindow>,
    generation: u64,
    /// Per slot: the ticket its next occupant must carry
    expected: Vec<Option<SlotTicket>>,
    initial: Option<InitialBatch>,
    catalog_rx: Option<flume::Receiver<CatalogResult>>,
    catalog_error: Option<String>,
    cart: Option<Box<dyn CartSink>>,
}

impl<F: AssetFetcher, B: RenderBackend> CarouselController<F, B> {
    pub fn new(scene: SceneRuntime<B>, fetcher: Arc<F>, runtime: Handle, cache_config: AssetCacheConfig) -> Self {
        let capacity = scene.layout().capacity();
        Self {
            scene,
            cache: AssetCache::new(fetcher, runtime.clone(), cache_config),
            runtime,
            catalog: Vec::new(),
            window: None,
            generation: 0,
            expected: vec![None; capacity],
            initial: None,
            catalog_rx: None,
            catalog_error: None,
            cart: None,
        }
    }

    pub fn with_cart(mut self, cart: Box<dyn CartSink>) -> Self {
        self.cart = Some(cart);
        self
    }

    /// Start fetching the catalog in the background
    pub fn request_catalog<C: CatalogSource>(&mut self, source: Arc<C>) {
        let (sender, receiver) = flume::bounded(1);
        self.runtime.spawn(async move {
            let result = source.fetch_catalog().await;
            let _ = sender.send(result);
        });
        self.catalog_rx = Some(receiver);
        self.catalog_error = None;
        log::debug!("catalog requested");
    }

    /// Install a catalog and load its first window
    pub fn set_catalog(&mut self, items: Vec<CatalogItem>) {
        self.catalog = items.into_iter().map(Arc::new).collect();
        let window = CarouselWindow::new(self.catalog.len(), self.scene.layout().capacity());
        log::info!("catalog has {} items, showing {}", window.len(), window.visible_indices().len());

        self.generation += 1;
        self.expected.iter_mut().for_each(|e| *e = None);
        self.window = Some(window);
        self.scene.set_visible_group(Vec::new());

        let mut batch = InitialBatch {
            generation: self.generation,
            ready: Vec::new(),
        };
        for (slot, index) in window.visible_indices().into_iter().enumerate() {
            if let Some(entry) = self.request_slot(slot, index) {
                batch.ready.push(entry);
            }
        }
        self.initial = Some(batch);
        self.flush_initial()
    }

    /// Resolve `index` for `slot`; cache hits come back immediately
    fn request_slot(&mut self, slot: usize, index: usize) -> Option<VisibleEntry> {
        let item = Arc::clone(&self.catalog[index]);
        let ticket = SlotTicket {
            slot,
            catalog_index: index,
            generation: self.generation,
        };
        match self.cache.resolve(item.asset_key(), &item, ticket) {
            Resolution::Ready(model) => Some(VisibleEntry {
                slot,
                catalog_index: index,
                item,
                model,
            }),
            Resolution::Pending => {
                self.expected[slot] = Some(ticket);
                None
            }
        }
    }

    fn flush_initial(&mut self) {
        let Some(batch) = &self.initial else {
            return;
        };
        let generation = batch.generation;
        if self.expected.iter().flatten().any(|t| t.generation == generation) {
            return;
        }
        if let Some(batch) = self.initial.take() {
            log::debug!("initial window settled with {} entries", batch.ready.len());
            self.commit_initial(batch);
        }
    }

    fn commit_initial(&mut self, batch: InitialBatch) {
        let failed = self.scene.set_visible_group(batch.ready);
        if !failed.is_empty() {
            log::warn!("{} slot(s) of the window could not be shown", failed.len());
        }
    }

    /// Attach a loaded entry; on failure the slot stays empty
    fn place(&mut self, entry: VisibleEntry) {
        let (slot, index) = (entry.slot, entry.catalog_index);
        if let Err(e) = self.scene.attach(entry) {
            log::warn!("slot {} stays empty, catalog #{} failed to attach: {}", slot, index, e);
        }
    }

    fn apply_catalog(&mut self, result: CatalogResult) {
        match result {
            Ok(items) => self.set_catalog(items),
            Err(e) => {
                let err = Error::CatalogFetch(e.to_string());
                log::warn!("{}", err);
                self.catalog_error = Some(err.to_string());
                self.set_catalog(Vec::new())
            }
        }
    }

    fn handle_settled(&mut self, settled: Settled) {
        let ticket = settled.ticket;
        if self.expected.get(ticket.slot).copied().flatten() != Some(ticket) {
            log::debug!(
                "discarding stale load of catalog #{} for slot {}",
                ticket.catalog_index,
                ticket.slot
            );
            return;
        }
        self.expected[ticket.slot] = None;

        match settled.result {
            Ok(model) => {
                let entry = VisibleEntry {
                    slot: ticket.slot,
                    catalog_index: ticket.catalog_index,
                    item: settled.item,
                    model,
                };
                match &mut self.initial {
                    Some(batch) if batch.generation == ticket.generation => batch.ready.push(entry),
                    _ => self.place(entry),
                }
            }
            Err(e) => log::warn!("slot {} stays empty: {}", ticket.slot, e),
        }
        self.flush_initial()
    }

    /// Drain settled catalog and asset loads. Call once per frame.
    pub fn poll(&mut self) {
        if let Some(receiver) = &self.catalog_rx {
            match receiver.try_recv() {
                Ok(result) => {
                    self.catalog_rx = None;
                    self.apply_catalog(result);
                }
                Err(flume::TryRecvError::Empty) => {}
                Err(flume::TryRecvError::Disconnected) => {
                    self.catalog_rx = None;
                    self.apply_catalog(Err(IoError::Http {
                        message: "catalog task ended without a result".to_string(),
                    }));
                }
            }
        }

        for settled in self.cache.poll() {
            self.handle_settled(settled);
        }
    }

    /// Block until the catalog and every outstanding load settle, or until
    /// `timeout` elapses. For headless drivers and tests.
    pub fn settle_blocking(&mut self, timeout: Duration) {
        let deadline = Instant::now() + timeout;
        if let Some(receiver) = self.catalog_rx.take() {
            match receiver.recv_deadline(deadline) {
                Ok(result) => self.apply_catalog(result),
                Err(flume::RecvTimeoutError::Timeout) => {
                    self.catalog_rx = Some(receiver);
                    return;
                }
                Err(flume::RecvTimeoutError::Disconnected) => self.apply_catalog(Err(IoError::Http {
                    message: "catalog task ended without a result".to_string(),
                })),
            }
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        for settled in self.cache.wait(remaining) {
            self.handle_settled(settled);
        }
    }

    /// Shift the window by one. Leaving occupants are evicted, staying ones
    /// are relocated, and only newly visible items are loaded.
    pub fn advance(&mut self, direction: Direction) -> Result<()> {
        let Some(window) = self.window else {
            return Ok(());
        };
        if window.is_empty() {
            return Ok(());
        }

        // An unfinished first window is committed as is
        if let Some(batch) = self.initial.take() {
            self.commit_initial(batch);
        }

        let next = window.advance(direction);
        self.generation += 1;
        // Pending loads for indices that stay visible are re-requested below
        // and join the in-flight fetch
        self.expected.iter_mut().for_each(|e| *e = None);

        let mut moves = Vec::new();
        for slot in self.scene.occupied_slots() {
            let Some(index) = self.scene.occupant(slot).map(|e| e.catalog_index) else {
                continue;
            };
            match next.slot_of(index) {
                None => {
                    self.scene.detach(slot);
                }
                Some(to) if to != slot => moves.push((slot, to)),
                Some(_) => {}
            }
        }
        self.scene.relocate_many(&moves)?;
        self.window = Some(next);

        for (slot, index) in next.visible_indices().into_iter().enumerate() {
            if self.scene.occupant(slot).map(|e| e.catalog_index) == Some(index) {
                continue;
            }
            if let Some(entry) = self.request_slot(slot, index) {
                self.place(entry);
            }
        }
        log::debug!("window now starts at {}", next.start());
        Ok(())
    }

    pub fn retreat(&mut self) -> Result<()> {
        self.advance(Direction::Backward)
    }

    /// Forward an activation to the cart; `true` if the cart took the item
    pub fn activate(&mut self, event: InteractionEvent) -> bool {
        match event {
            InteractionEvent::ItemActivated(item) => match &mut self.cart {
                Some(cart) => cart.add(item),
                None => {
                    log::info!("activated '{}' with no cart attached", item.item_id());
                    false
                }
            },
        }
    }

    /// True while the catalog or any load for the current window is outstanding
    pub fn is_loading(&self) -> bool {
        self.catalog_rx.is_some() || self.initial.is_some() || self.expected.iter().any(Option::is_some)
    }

    pub fn window(&self) -> Option<&CarouselWindow> {
        self.window.as_ref()
    }

    pub fn catalog(&self) -> &[Arc<CatalogItem>] {
        &self.catalog
    }

    pub fn catalog_error(&self) -> Option<&str> {
        self.catalog_error.as_deref()
    }

    pub fn cache(&self) -> &AssetCache<F> {
        &self.cache
    }

    pub fn scene(&self) -> &SceneRuntime<B> {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneRuntime<B> {
        &mut self.scene
    }

    pub fn unmount(&mut self) -> DisposalReport {
        self.catalog_rx = None;
        self.initial = None;
        self.expected.iter_mut().for_each(|e| *e = None);
        self.scene.unmount()
    }
}
