//! Shopping cart collaborator

use std::sync::{Arc, Mutex};

use wardrobe_core::{CatalogItem, ItemId};

/// Receives activated catalog items
pub trait CartSink {
    /// Returns `false` when the item was not added, e.g. already present
    fn add(&mut self, item: Arc<CatalogItem>) -> bool;
}

/// In-memory cart, one entry per item id
#[derive(Debug, Default, Clone)]
pub struct Cart {
    items: Vec<Arc<CatalogItem>>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.iter().any(|i| &i.item_id() == id)
    }

    pub fn remove(&mut self, id: &ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| &i.item_id() != id);
        self.items.len() != before
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|i| i.price).sum()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Arc<CatalogItem>] {
        &self.items
    }
}

impl CartSink for Cart {
    fn add(&mut self, item: Arc<CatalogItem>) -> bool {
        if self.contains(&item.item_id()) {
            log::debug!("'{}' already in cart", item.item_id());
            return false;
        }
        log::info!("added {} '{}' to cart", item.kind, item.item_id());
        self.items.push(item);
        true
    }
}

/// Shared sinks, so the host can keep reading the cart it handed out
impl<T: CartSink> CartSink for Arc<Mutex<T>> {
    fn add(&mut self, item: Arc<CatalogItem>) -> bool {
        match self.lock() {
            Ok(mut sink) => sink.add(item),
            Err(poisoned) => poisoned.into_inner().add(item),
        }
    }
}
