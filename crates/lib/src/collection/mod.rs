//! Token-addressed ordered collections of items.
//!
//! A [`Collection`] owns one chain of items behind its own `RwLock`. Reads
//! (`get_all`, `get_by_id`) share the lock, every mutation holds it
//! exclusively for the duration of a single operation, so no caller ever
//! observes a chain that is halfway through being relinked.
//!
//! New items are always inserted at the head (newest first). Positions only
//! change through explicit [`move_up`](Collection::move_up) /
//! [`move_down`](Collection::move_down) swaps.

mod chain;
pub mod errors;


use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::Result;
use crate::item::{IdSequence, Item, ItemId, ItemPayload, ItemUpdate, MoveDirection};
use crate::token::Token;
use chain::Chain;

pub use errors::CollectionError;

/// An ordered list of items addressed by its token.
///
/// Collections are created by a [`Registry`](crate::Registry) and handed out
/// as `Arc<Collection>`; they are never destroyed while the registry lives.
#[derive(Debug)]
pub struct Collection {
    token: Token,
    ids: Arc<IdSequence>,
    chain: RwLock<Chain>,
}

impl Collection {
    /// Creates an empty collection drawing item ids from `ids`.
    pub fn new(token: Token, ids: Arc<IdSequence>) -> Self {
        Self {
            token,
            ids,
            chain: RwLock::new(Chain::new()),
        }
    }

    /// The collection's token.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Acquires the chain for reading.
    ///
    /// A poisoned lock means a mutation panicked midway, so the chain behind
    /// it is treated as corrupt.
    fn read(&self) -> std::result::Result<RwLockReadGuard<'_, Chain>, CollectionError> {
        self.chain
            .read()
            .map_err(|_| CollectionError::IntegrityViolation {
                reason: "collection lock poisoned by an interrupted mutation".to_string(),
            })
    }

    fn write(&self) -> std::result::Result<RwLockWriteGuard<'_, Chain>, CollectionError> {
        self.chain
            .write()
            .map_err(|_| CollectionError::IntegrityViolation {
                reason: "collection lock poisoned by an interrupted mutation".to_string(),
            })
    }

    /// Converts a chain result, reporting integrity violations loudly.
    fn finish<T>(
        &self,
        operation: &'static str,
        result: std::result::Result<T, CollectionError>,
    ) -> Result<T> {
        result.map_err(|err| {
            if err.is_integrity_error() {
                tracing::error!(
                    token = %self.token.log_prefix(),
                    operation,
                    error = %err,
                    "Collection chain is corrupt; operation refused"
                );
            }
            err.into()
        })
    }

    /// Returns every item, head first.
    ///
    /// An empty collection yields an empty vector.
    pub fn get_all(&self) -> Result<Vec<Item>> {
        let result = self.read().and_then(|chain| chain.items());
        self.finish("get_all", result)
    }

    /// Returns the item with the given id.
    pub fn get_by_id(&self, id: ItemId) -> Result<Item> {
        let result = self.read().and_then(|chain| chain.get(id).cloned());
        self.finish("get_by_id", result)
    }

    /// Number of items currently in the collection.
    pub fn len(&self) -> Result<usize> {
        let result = self.read().map(|chain| chain.len());
        self.finish("len", result)
    }

    /// True if the collection holds no items.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Id of the first item, if any.
    pub fn head(&self) -> Result<Option<ItemId>> {
        let result = self.read().map(|chain| chain.head());
        self.finish("head", result)
    }

    /// Checks every chain invariant.
    pub fn verify(&self) -> Result<()> {
        let result = self.read().and_then(|chain| chain.verify());
        self.finish("verify", result)
    }

    /// Creates a new item from `payload` and inserts it at the head.
    pub fn add(&self, payload: ItemPayload) -> Result<Item> {
        let result = self.write().and_then(|mut chain| {
            let item = Item::new(self.ids.next_id(), payload);
            chain.push_front(item)
        });
        let item = self.finish("add", result)?;
        tracing::debug!(token = %self.token.log_prefix(), item_id = %item.id, "Item added");
        Ok(item)
    }

    /// Replaces the content fields of an item. Its position is unchanged.
    pub fn update(&self, id: ItemId, payload: ItemPayload) -> Result<Item> {
        let result = self
            .write()
            .and_then(|mut chain| chain.update(id, payload));
        let item = self.finish("update", result)?;
        tracing::debug!(token = %self.token.log_prefix(), item_id = %id, "Item updated");
        Ok(item)
    }

    /// Detaches an item from the collection.
    ///
    /// The returned copy has both links cleared; the id is never valid in
    /// this (or any other) collection again.
    pub fn remove(&self, id: ItemId) -> Result<Item> {
        let result = self.write().and_then(|mut chain| chain.remove(id));
        let item = self.finish("remove", result)?;
        tracing::debug!(token = %self.token.log_prefix(), item_id = %id, "Item removed");
        Ok(item)
    }

    /// Swaps an item with its predecessor. Moving the head is a no-op.
    pub fn move_up(&self, id: ItemId) -> Result<Item> {
        self.move_item(id, MoveDirection::Up)
    }

    /// Swaps an item with its successor. Moving the tail is a no-op.
    pub fn move_down(&self, id: ItemId) -> Result<Item> {
        self.move_item(id, MoveDirection::Down)
    }

    /// Moves an item one position in `direction`.
    ///
    /// `MoveDirection::None` only checks that the item exists.
    pub fn move_item(&self, id: ItemId, direction: MoveDirection) -> Result<Item> {
        let result = self
            .write()
            .and_then(|mut chain| Self::relocate(&mut chain, id, direction));
        let item = self.finish("move", result)?;
        tracing::debug!(
            token = %self.token.log_prefix(),
            item_id = %id,
            ?direction,
            "Item moved"
        );
        Ok(item)
    }

    /// Replaces an item's content fields, then moves it.
    ///
    /// Both steps run under one write lock. If the item does not exist the
    /// move is never attempted.
    pub fn update_and_move(
        &self,
        id: ItemId,
        payload: ItemPayload,
        direction: MoveDirection,
    ) -> Result<Item> {
        let result = self.write().and_then(|mut chain| {
            let merged = chain.update(id, payload)?;
            Self::relocate(&mut chain, merged.id, direction)
        });
        let item = self.finish("update_and_move", result)?;
        tracing::debug!(
            token = %self.token.log_prefix(),
            item_id = %id,
            ?direction,
            "Item updated and moved"
        );
        Ok(item)
    }

    /// Applies a decoded update request.
    pub fn apply(&self, update: ItemUpdate) -> Result<Item> {
        self.update_and_move(update.id, update.payload, update.direction)
    }

    fn relocate(
        chain: &mut Chain,
        id: ItemId,
        direction: MoveDirection,
    ) -> std::result::Result<Item, CollectionError> {
        match direction {
            MoveDirection::None => chain.get(id).cloned(),
            MoveDirection::Up => chain.move_up(id),
            MoveDirection::Down => chain.move_down(id),
        }
    }
}
