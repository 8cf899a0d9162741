//! Arena-backed doubly-linked chain of items.
//!
//! Items live in a `HashMap` keyed by id; `head`, `prev` and `next` are ids
//! into that map. The chain itself performs no locking, the owning
//! [`Collection`](super::Collection) wraps it in an `RwLock`.
//!
//! Every mutation validates the links it is about to touch before changing
//! anything, so an operation that reports an integrity violation leaves the
//! chain exactly as it found it.

use std::collections::HashMap;

use super::errors::CollectionError;
use crate::item::{Item, ItemId, ItemPayload};

type Result<T> = std::result::Result<T, CollectionError>;

fn violation(reason: String) -> CollectionError {
    CollectionError::IntegrityViolation { reason }
}

/// Ordered items of one collection.
#[derive(Debug, Default)]
pub(crate) struct Chain {
    head: Option<ItemId>,
    items: HashMap<ItemId, Item>,
}

impl Chain {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn head(&self) -> Option<ItemId> {
        self.head
    }

    /// Looks up a member item by id.
    pub(crate) fn get(&self, id: ItemId) -> Result<&Item> {
        self.items
            .get(&id)
            .ok_or(CollectionError::ItemNotFound { id })
    }

    /// Resolves a link stored on item `from`.
    ///
    /// A link to an id outside the arena is a dangling link, so a miss here is
    /// an integrity violation rather than a lookup failure.
    fn linked(&self, id: ItemId, from: ItemId) -> Result<&Item> {
        self.items.get(&id).ok_or_else(|| {
            violation(format!(
                "item {from} links to {id}, which is not part of the collection"
            ))
        })
    }

    fn linked_mut(&mut self, id: ItemId, from: ItemId) -> Result<&mut Item> {
        self.items.get_mut(&id).ok_or_else(|| {
            violation(format!(
                "item {from} links to {id}, which is not part of the collection"
            ))
        })
    }

    /// Walks head to tail, checking every invariant on the way.
    fn walk(&self) -> Result<Vec<&Item>> {
        let mut ordered = Vec::with_capacity(self.items.len());
        let mut expected_prev = None;
        let mut cursor = self.head;

        while let Some(id) = cursor {
            if ordered.len() == self.items.len() {
                return Err(violation(format!(
                    "chain continues to {id} past its {} items",
                    ordered.len()
                )));
            }
            let item = match expected_prev {
                Some(prev) => self.linked(id, prev)?,
                None => self.items.get(&id).ok_or_else(|| {
                    violation(format!("head {id} is not part of the collection"))
                })?,
            };
            if item.id != id {
                return Err(violation(format!(
                    "arena slot {id} holds item {}",
                    item.id
                )));
            }
            if item.prev != expected_prev {
                return Err(violation(format!(
                    "item {id} links back to {:?}, expected {:?}",
                    item.prev, expected_prev
                )));
            }
            ordered.push(item);
            expected_prev = Some(id);
            cursor = item.next;
        }

        if ordered.len() != self.items.len() {
            return Err(violation(format!(
                "{} of {} items are unreachable from the head",
                self.items.len() - ordered.len(),
                self.items.len()
            )));
        }
        Ok(ordered)
    }

    /// Checks all chain invariants without copying anything.
    pub(crate) fn verify(&self) -> Result<()> {
        self.walk().map(|_| ())
    }

    /// Snapshot of all items in chain order.
    pub(crate) fn items(&self) -> Result<Vec<Item>> {
        Ok(self.walk()?.into_iter().cloned().collect())
    }

    /// Ids in chain order.
    #[cfg(test)]
    pub(crate) fn ids(&self) -> Result<Vec<ItemId>> {
        Ok(self.walk()?.into_iter().map(|item| item.id).collect())
    }

    /// Inserts `item` as the new head.
    pub(crate) fn push_front(&mut self, mut item: Item) -> Result<Item> {
        let id = item.id;
        if self.items.contains_key(&id) {
            return Err(violation(format!("item id {id} is already in use")));
        }

        item.prev = None;
        item.next = self.head;
        if let Some(old_head) = self.head {
            let old = self.items.get_mut(&old_head).ok_or_else(|| {
                violation(format!("head {old_head} is not part of the collection"))
            })?;
            if old.prev.is_some() {
                return Err(violation(format!(
                    "head {old_head} has predecessor {:?}",
                    old.prev
                )));
            }
            old.prev = Some(id);
        }

        self.head = Some(id);
        self.items.insert(id, item.clone());
        Ok(item)
    }

    /// Replaces the content fields of item `id`; its position is unchanged.
    pub(crate) fn update(&mut self, id: ItemId, payload: ItemPayload) -> Result<Item> {
        let item = self
            .items
            .get_mut(&id)
            .ok_or(CollectionError::ItemNotFound { id })?;
        item.merge(payload);
        Ok(item.clone())
    }

    /// Detaches item `id` and returns it with both links cleared.
    pub(crate) fn remove(&mut self, id: ItemId) -> Result<Item> {
        let item = self.get(id)?;
        let (prev, next) = (item.prev, item.next);

        match prev {
            Some(prev) => {
                if self.linked(prev, id)?.next != Some(id) {
                    return Err(violation(format!(
                        "predecessor {prev} of item {id} does not link forward to it"
                    )));
                }
            }
            None => {
                if self.head != Some(id) {
                    return Err(violation(format!(
                        "item {id} has no predecessor but the head is {:?}",
                        self.head
                    )));
                }
            }
        }
        if let Some(next) = next
            && self.linked(next, id)?.prev != Some(id)
        {
            return Err(violation(format!(
                "successor {next} of item {id} does not link back to it"
            )));
        }

        if let Some(next) = next {
            self.linked_mut(next, id)?.prev = prev;
        }
        match prev {
            Some(prev) => self.linked_mut(prev, id)?.next = next,
            None => self.head = next,
        }

        let mut removed = self
            .items
            .remove(&id)
            .ok_or(CollectionError::ItemNotFound { id })?;
        removed.prev = None;
        removed.next = None;
        Ok(removed)
    }

    /// Swaps item `id` with its predecessor. No-op for the head.
    pub(crate) fn move_up(&mut self, id: ItemId) -> Result<Item> {
        if self.get(id)?.is_head() {
            return Ok(self.get(id)?.clone());
        }
        self.swap_with_prev(id)?;
        Ok(self.get(id)?.clone())
    }

    /// Swaps item `id` with its successor. No-op for the tail.
    pub(crate) fn move_down(&mut self, id: ItemId) -> Result<Item> {
        if let Some(next) = self.get(id)?.next {
            if self.linked(next, id)?.prev != Some(id) {
                return Err(violation(format!(
                    "successor {next} of item {id} does not link back to it"
                )));
            }
            self.swap_with_prev(next)?;
        }
        Ok(self.get(id)?.clone())
    }

    /// Lets item `id` trade places with its predecessor.
    ///
    /// ```text
    /// before: outer_prev -> prev -> id -> outer_next
    /// after:  outer_prev -> id -> prev -> outer_next
    /// ```
    fn swap_with_prev(&mut self, id: ItemId) -> Result<()> {
        let item = self.get(id)?;
        let (prev, outer_next) = match item.prev {
            Some(prev) => (prev, item.next),
            None => return Ok(()),
        };

        let prev_item = self.linked(prev, id)?;
        if prev_item.next != Some(id) {
            return Err(violation(format!(
                "predecessor {prev} of item {id} does not link forward to it"
            )));
        }
        let outer_prev = prev_item.prev;
        match outer_prev {
            Some(outer) => {
                if self.linked(outer, prev)?.next != Some(prev) {
                    return Err(violation(format!(
                        "predecessor {outer} of item {prev} does not link forward to it"
                    )));
                }
            }
            None => {
                if self.head != Some(prev) {
                    return Err(violation(format!(
                        "item {prev} has no predecessor but the head is {:?}",
                        self.head
                    )));
                }
            }
        }
        if let Some(outer) = outer_next
            && self.linked(outer, id)?.prev != Some(id)
        {
            return Err(violation(format!(
                "successor {outer} of item {id} does not link back to it"
            )));
        }

        match outer_prev {
            Some(outer) => self.linked_mut(outer, prev)?.next = Some(id),
            None => self.head = Some(id),
        }
        if let Some(outer) = outer_next {
            self.linked_mut(outer, id)?.prev = Some(prev);
        }

        let prev_item = self.linked_mut(prev, id)?;
        prev_item.prev = Some(id);
        prev_item.next = outer_next;

        let item = self
            .items
            .get_mut(&id)
            .ok_or(CollectionError::ItemNotFound { id })?;
        item.prev = outer_prev;
        item.next = Some(prev);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn item_mut_for_test(&mut self, id: ItemId) -> &mut Item {
        self.items.get_mut(&id).expect("item should exist")
    }

    #[cfg(test)]
    pub(crate) fn set_head_for_test(&mut self, head: Option<ItemId>) {
        self.head = head;
    }
}
