//! Shared helpers for benchmark tests

use std::sync::Arc;

use tokenlist::{Collection, Item, ItemPayload, Registry};

/// Creates a registry holding one collection pre-populated with `item_count`
/// items named "item_N". Items are returned in insertion order, so the last
/// one sits at the head.
pub fn setup_collection(item_count: usize) -> (Registry, Arc<Collection>, Vec<Item>) {
    let registry = Registry::new();
    let token = registry.create().expect("Failed to create collection");
    let collection = registry
        .resolve(token.as_str())
        .expect("Failed to resolve fresh token");

    let items = (0..item_count)
        .map(|i| {
            collection
                .add(ItemPayload::named(format!("item_{i}")))
                .expect("Failed to add item")
        })
        .collect();

    (registry, collection, items)
}
