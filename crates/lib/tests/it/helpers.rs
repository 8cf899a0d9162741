//! Shared helpers for integration tests.

use std::sync::Arc;

use tokenlist::{Collection, Item, ItemId, ItemPayload, Registry};

/// Creates a registry with one fresh collection.
pub fn registry_with_collection() -> (Registry, Arc<Collection>) {
    let registry = Registry::new();
    let token = registry.create().expect("Failed to create collection");
    let collection = registry
        .resolve(token.as_str())
        .expect("Fresh token should resolve");
    (registry, collection)
}

/// Creates a fresh collection holding one item per name.
///
/// Names are added in order, so the last name ends up at the head.
pub fn collection_with(names: &[&str]) -> (Registry, Arc<Collection>, Vec<Item>) {
    let (registry, collection) = registry_with_collection();
    let items = names
        .iter()
        .map(|name| {
            collection
                .add(ItemPayload::named(*name))
                .expect("Failed to add item")
        })
        .collect();
    (registry, collection, items)
}

/// Item names in chain order.
pub fn names(collection: &Collection) -> Vec<String> {
    collection
        .get_all()
        .expect("Failed to list items")
        .into_iter()
        .map(|item| item.name)
        .collect()
}

/// Item ids in chain order.
pub fn ids(collection: &Collection) -> Vec<ItemId> {
    collection
        .get_all()
        .expect("Failed to list items")
        .into_iter()
        .map(|item| item.id)
        .collect()
}

/// Asserts every chain invariant and that the returned links agree with the
/// order `get_all` reports.
pub fn assert_chain_consistent(collection: &Collection) {
    collection.verify().expect("Chain should verify");

    let items = collection.get_all().expect("Failed to list items");
    for (index, item) in items.iter().enumerate() {
        let expected_prev = index.checked_sub(1).map(|i| items[i].id);
        let expected_next = items.get(index + 1).map(|next| next.id);
        assert_eq!(item.prev, expected_prev, "prev link of item {}", item.id);
        assert_eq!(item.next, expected_next, "next link of item {}", item.id);
    }
    assert_eq!(
        collection.head().expect("Failed to read head"),
        items.first().map(|item| item.id)
    );
    assert_eq!(collection.len().expect("Failed to read length"), items.len());
}
