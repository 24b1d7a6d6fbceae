//! Memoized asynchronous asset loading
//!
//! Loads run as tokio tasks and report back over a flume channel. The cache
//! keeps one canonical, normalized [`Model`] per key and hands out deep
//! clones, so no two scene objects ever share geometry or a pose.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use wardrobe_core::{AssetLoadError, AssetLoadFailure, CatalogItem, Model, ModelInstance};
use wardrobe_io::{decode_model, AssetFetcher};

/// Identifies what a slot expects its next occupant to be.
///
/// `generation` changes with every window shift, so a load issued for an
/// earlier window never matches a current expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotTicket {
    pub slot: usize,
    pub catalog_index: usize,
    pub generation: u64,
}

/// Outcome of [`AssetCache::resolve`]
#[derive(Debug)]
pub enum Resolution {
    /// Cache hit: a fresh clone tagged with the requesting item
    Ready(ModelInstance),
    /// Load started or joined; the result arrives through `poll`/`wait`
    Pending,
}

/// A load that finished for one waiting ticket
#[derive(Debug)]
pub struct Settled {
    pub ticket: SlotTicket,
    pub item: Arc<CatalogItem>,
    pub result: Result<ModelInstance, AssetLoadError>,
}

/// Asset cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetCacheConfig {
    /// Height every model is rescaled to, in world units
    pub target_height: f32,
    /// Upper bound for one fetch + decode; `None` waits forever
    pub load_timeout_ms: Option<u64>,
}

impl Default for AssetCacheConfig {
    fn default() -> Self {
        Self {
            target_height: 8.0,
            load_timeout_ms: Some(15_000),
        }
    }
}

struct Waiter {
    ticket: SlotTicket,
    item: Arc<CatalogItem>,
}

type LoadMessage = (String, Result<Model, AssetLoadError>);

/// Keyed model cache with request coalescing
pub struct AssetCache<F: AssetFetcher> {
    fetcher: Arc<F>,
    runtime: Handle,
    config: AssetCacheConfig,
    canonical: HashMap<String, Arc<Model>>,
    in_flight: HashMap<String, Vec<Waiter>>,
    sender: flume::Sender<LoadMessage>,
    receiver: flume::Receiver<LoadMessage>,
    fetches_started: usize,
}

impl<F: AssetFetcher> AssetCache<F> {
    pub fn new(fetcher: Arc<F>, runtime: Handle, config: AssetCacheConfig) -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            fetcher,
            runtime,
            config,
            canonical: HashMap::new(),
            in_flight: HashMap::new(),
            sender,
            receiver,
            fetches_started: 0,
        }
    }

    /// Return a clone of the cached model for `key`, or start (or join) the
    /// load that will produce one for `ticket`
    pub fn resolve(&mut self, key: &str, item: &Arc<CatalogItem>, ticket: SlotTicket) -> Resolution {
        if let Some(model) = self.canonical.get(key) {
            return Resolution::Ready(model.instantiate(item));
        }

        let waiter = Waiter {
            ticket,
            item: Arc::clone(item),
        };
        if let Some(waiters) = self.in_flight.get_mut(key) {
            log::debug!("joining in-flight load of '{}'", key);
            waiters.push(waiter);
            return Resolution::Pending;
        }

        self.in_flight.insert(key.to_string(), vec![waiter]);
        self.spawn_load(key.to_string());
        Resolution::Pending
    }

    fn spawn_load(&mut self, key: String) {
        self.fetches_started += 1;
        log::debug!("loading '{}'", key);

        let fetcher = Arc::clone(&self.fetcher);
        let sender = self.sender.clone();
        let target_height = self.config.target_height;
        let timeout = self.config.load_timeout_ms.map(Duration::from_millis);

        self.runtime.spawn(async move {
            let load = load_model(fetcher.as_ref(), &key, target_height);
            let result = match timeout {
                Some(limit) => tokio::time::timeout(limit, load)
                    .await
                    .unwrap_or_else(|_| Err(AssetLoadError::new(key.as_str(), AssetLoadFailure::TimedOut))),
                None => load.await,
            };
            // The cache may already be gone; nobody is left to tell
            let _ = sender.send((key, result));
        });
    }

    /// Drain every load that has settled so far without blocking
    pub fn poll(&mut self) -> Vec<Settled> {
        let messages: Vec<LoadMessage> = self.receiver.try_iter().collect();
        messages
            .into_iter()
            .flat_map(|(key, result)| self.settle(key, result))
            .collect()
    }

    /// Block until every in-flight load settles or `timeout` elapses
    pub fn wait(&mut self, timeout: Duration) -> Vec<Settled> {
        let deadline = Instant::now() + timeout;
        let mut settled = self.poll();
        while !self.in_flight.is_empty() {
            match self.receiver.recv_deadline(deadline) {
                Ok((key, result)) => settled.extend(self.settle(key, result)),
                Err(_) => break,
            }
        }
        settled
    }

    fn settle(&mut self, key: String, result: Result<Model, AssetLoadError>) -> Vec<Settled> {
        let waiters = self.in_flight.remove(&key).unwrap_or_default();
        match result {
            Ok(model) => {
                log::debug!("loaded '{}' ({} parts, {} faces)", key, model.parts.len(), model.face_count());
                let model = Arc::new(model);
                self.canonical.insert(key, Arc::clone(&model));
                waiters
                    .into_iter()
                    .map(|w| Settled {
                        ticket: w.ticket,
                        result: Ok(model.instantiate(&w.item)),
                        item: w.item,
                    })
                    .collect()
            }
            Err(err) => {
                // Not cached: the next request retries
                log::warn!("{}", err);
                waiters
                    .into_iter()
                    .map(|w| Settled {
                        ticket: w.ticket,
                        item: w.item,
                        result: Err(err.clone()),
                    })
                    .collect()
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.canonical.contains_key(key)
    }

    pub fn is_loading(&self, key: &str) -> bool {
        self.in_flight.contains_key(key)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Number of network loads issued; coalesced requests do not count
    pub fn fetches_started(&self) -> usize {
        self.fetches_started
    }

    /// Read-only view of the canonical model for `key`
    pub fn canonical(&self, key: &str) -> Option<&Model> {
        self.canonical.get(key).map(Arc::as_ref)
    }
}

/// Fetch, decode and normalize one asset
async fn load_model<F: AssetFetcher>(fetcher: &F, key: &str, target_height: f32) -> Result<Model, AssetLoadError> {
    let bytes = fetcher
        .fetch_asset(key)
        .await
        .map_err(|e| AssetLoadError::new(key, e.as_load_failure()))?;
    let model = decode_model(key, &bytes).map_err(|e| AssetLoadError::new(key, e.as_load_failure()))?;
    prepare_model(key, model, target_height)
}

/// Normalize a decoded model for display: uniform height, grounded at
/// Y = 0, double-sided materials, normals present
pub fn prepare_model(key: &str, mut model: Model, target_height: f32) -> Result<Model, AssetLoadError> {
    if model.is_empty() {
        return Err(AssetLoadError::new(key, AssetLoadFailure::EmptyGeometry));
    }
    for part in &mut model.parts {
        part.material.double_sided = true;
        if part.mesh.normals.is_none() {
            part.mesh.compute_vertex_normals();
        }
    }
    if model.normalize_height(target_height).is_none() {
        log::debug!("'{}' has no vertical extent, keeping its scale", key);
    }
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wardrobe_core::Drawable;
    use wardrobe_io::IoError;

    const TRIANGLE: &str = "v 0 0 0\nv 2 0 0\nv 0 4 0\nf 1 2 3\n";

    struct CountingFetcher {
        calls: AtomicUsize,
        gate: flume::Receiver<()>,
    }

    impl AssetFetcher for CountingFetcher {
        async fn fetch_asset(&self, key: &str) -> Result<Vec<u8>, IoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _ = self.gate.recv_async().await;
            match key {
                "broken" => Ok(b"f 9 9 9\n".to_vec()),
                "missing" => Err(IoError::FileNotFound { path: key.to_string() }),
                _ => Ok(TRIANGLE.as_bytes().to_vec()),
            }
        }
    }

    fn item(name: &str) -> Arc<CatalogItem> {
        Arc::new(CatalogItem {
            id: Some(name.into()),
            kind: "shirt".to_string(),
            size: None,
            color: None,
            photo_filename: name.to_string(),
            price: 5.0,
        })
    }

    fn ticket(slot: usize) -> SlotTicket {
        SlotTicket {
            slot,
            catalog_index: slot,
            generation: 1,
        }
    }

    fn setup() -> (tokio::runtime::Runtime, flume::Sender<()>, AssetCache<CountingFetcher>) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (open, gate) = flume::unbounded();
        let fetcher = Arc::new(CountingFetcher {
            calls: AtomicUsize::new(0),
            gate,
        });
        let cache = AssetCache::new(fetcher, runtime.handle().clone(), AssetCacheConfig::default());
        (runtime, open, cache)
    }

    #[test]
    fn test_concurrent_requests_coalesce() {
        let (_runtime, open, mut cache) = setup();
        let shirt = item("shirt");

        assert!(matches!(cache.resolve("shirt", &shirt, ticket(0)), Resolution::Pending));
        assert!(matches!(cache.resolve("shirt", &shirt, ticket(1)), Resolution::Pending));
        assert_eq!(cache.fetches_started(), 1);
        assert!(cache.is_loading("shirt"));
        assert!(!cache.contains("shirt"));

        open.send(()).unwrap();
        let settled = cache.wait(Duration::from_secs(5));
        assert!(!cache.is_loading("shirt"));
        assert!(cache.contains("shirt"));
        assert_eq!(settled.len(), 2);
        assert!(settled.iter().all(|s| s.result.is_ok()));
        assert_eq!(cache.fetcher.calls.load(Ordering::SeqCst), 1);

        // Now cached: served synchronously
        assert!(matches!(cache.resolve("shirt", &shirt, ticket(2)), Resolution::Ready(_)));
        assert_eq!(cache.fetches_started(), 1);
    }

    #[test]
    fn test_clones_are_independent_and_normalized() {
        let (_runtime, open, mut cache) = setup();
        let shirt = item("shirt");
        cache.resolve("shirt", &shirt, ticket(0));
        open.send(()).unwrap();
        cache.wait(Duration::from_secs(5));

        let (Resolution::Ready(mut a), Resolution::Ready(b)) =
            (cache.resolve("shirt", &shirt, ticket(0)), cache.resolve("shirt", &shirt, ticket(1)))
        else {
            panic!("expected cache hits");
        };
        a.pose.translation.x = 42.0;
        a.parts[0].mesh.scale(3.0);
        assert_eq!(b.pose.translation.x, 0.0);

        let canonical = cache.canonical("shirt").unwrap();
        let (min, max) = canonical.bounding_box();
        assert_relative_eq!(max.y - min.y, 8.0, epsilon = 1e-5);
        assert_relative_eq!(min.y, 0.0, epsilon = 1e-5);
        assert!(canonical.parts.iter().all(|p| p.material.double_sided && p.owner.is_none()));
        assert_eq!(b.owner().unwrap().photo_filename, "shirt");
    }

    #[test]
    fn test_failures_are_classified_and_not_cached() {
        let (_runtime, open, mut cache) = setup();
        cache.resolve("broken", &item("broken"), ticket(0));
        cache.resolve("missing", &item("missing"), ticket(1));
        open.send(()).unwrap();
        open.send(()).unwrap();

        let mut settled = cache.wait(Duration::from_secs(5));
        settled.sort_by_key(|s| s.ticket.slot);
        let kinds: Vec<AssetLoadFailure> = settled
            .into_iter()
            .map(|s| s.result.unwrap_err().kind)
            .collect();
        assert!(matches!(kinds[0], AssetLoadFailure::Decode(_) | AssetLoadFailure::EmptyGeometry));
        assert!(matches!(kinds[1], AssetLoadFailure::Fetch(_)));

        assert!(!cache.contains("missing"));
        assert!(matches!(cache.resolve("missing", &item("missing"), ticket(1)), Resolution::Pending));
        assert_eq!(cache.fetches_started(), 3);
    }

    #[test]
    fn test_stalled_load_times_out() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (_open, gate) = flume::unbounded();
        let fetcher = Arc::new(CountingFetcher {
            calls: AtomicUsize::new(0),
            gate,
        });
        let config = AssetCacheConfig {
            load_timeout_ms: Some(50),
            ..AssetCacheConfig::default()
        };
        let mut cache = AssetCache::new(fetcher, runtime.handle().clone(), config);

        cache.resolve("shirt", &item("shirt"), ticket(0));
        let settled = cache.wait(Duration::from_secs(5));
        assert_eq!(settled.len(), 1);
        assert_eq!(settled[0].result.as_ref().unwrap_err().kind, AssetLoadFailure::TimedOut);
        assert_eq!(cache.in_flight(), 0);
    }

    #[test]
    fn test_prepare_rejects_empty_models() {
        let err = prepare_model("nothing", Model::default(), 8.0).unwrap_err();
        assert_eq!(err.kind, AssetLoadFailure::EmptyGeometry);
    }
}
