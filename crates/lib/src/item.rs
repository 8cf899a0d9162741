//! Item records and the values callers use to create and change them.
//!
//! An [`Item`] carries its content fields plus the `prev`/`next` links that
//! place it inside its collection's chain. Links are item ids, not
//! references; the owning collection's arena resolves them.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::FIRST_ITEM_ID;

/// Process-unique identifier of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Wraps a raw id value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Monotonic item id allocator.
///
/// One sequence is owned by a [`Registry`](crate::Registry) and shared by all
/// of its collections, so ids stay unique across collections and are never
/// handed out twice, even after the item they named is removed.
#[derive(Debug)]
pub struct IdSequence {
    next: AtomicU64,
}

impl IdSequence {
    /// Creates a sequence starting at [`FIRST_ITEM_ID`].
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(FIRST_ITEM_ID),
        }
    }

    /// Hands out the next id.
    pub fn next_id(&self) -> ItemId {
        ItemId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Content fields supplied by a caller when adding or updating an item.
///
/// Missing or `null` fields deserialize to their empty values. No identity
/// fields are accepted here; ids are assigned by the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemPayload {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub done: bool,
    /// Tags in caller order.
    #[serde(deserialize_with = "null_as_default")]
    pub category: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ItemPayload {
    /// Payload with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A single record in a collection.
///
/// Values returned by collection operations are snapshots: changing one does
/// not affect the stored item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub text: String,
    pub done: bool,
    pub category: Vec<String>,
    /// Predecessor in chain order; `None` for the head.
    #[serde(skip)]
    pub prev: Option<ItemId>,
    /// Successor in chain order; `None` for the tail.
    #[serde(skip)]
    pub next: Option<ItemId>,
}

impl Item {
    /// Builds an unlinked item from a payload.
    pub fn new(id: ItemId, payload: ItemPayload) -> Self {
        Self {
            id,
            name: payload.name,
            text: payload.text,
            done: payload.done,
            category: payload.category,
            prev: None,
            next: None,
        }
    }

    /// Replaces every content field with the payload's values.
    ///
    /// `id`, `prev` and `next` are left untouched.
    pub fn merge(&mut self, payload: ItemPayload) {
        self.name = payload.name;
        self.text = payload.text;
        self.done = payload.done;
        self.category = payload.category;
    }

    /// The item's content fields as a payload.
    pub fn payload(&self) -> ItemPayload {
        ItemPayload {
            name: self.name.clone(),
            text: self.text.clone(),
            done: self.done,
            category: self.category.clone(),
        }
    }

    /// True if the item has no predecessor.
    pub fn is_head(&self) -> bool {
        self.prev.is_none()
    }

    /// True if the item has no successor.
    pub fn is_tail(&self) -> bool {
        self.next.is_none()
    }
}

/// Positional change requested together with an update.
///
/// On the wire this is the integer `upOrDown`: `0` (or `null`) is no move,
/// `1` moves up, and any other value moves down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveDirection {
    #[default]
    None,
    /// Towards the head.
    Up,
    /// Towards the tail.
    Down,
}

impl From<i64> for MoveDirection {
    fn from(code: i64) -> Self {
        match code {
            0 => MoveDirection::None,
            1 => MoveDirection::Up,
            _ => MoveDirection::Down,
        }
    }
}

impl From<MoveDirection> for i64 {
    fn from(direction: MoveDirection) -> Self {
        match direction {
            MoveDirection::None => 0,
            MoveDirection::Up => 1,
            MoveDirection::Down => -1,
        }
    }
}

impl Serialize for MoveDirection {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        i64::from(*self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MoveDirection {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<i64>::deserialize(deserializer)
            .map(|code| code.map(MoveDirection::from).unwrap_or_default())
    }
}

/// An update request: target id, new content and an optional move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub id: ItemId,
    #[serde(flatten)]
    pub payload: ItemPayload,
    #[serde(default, rename = "upOrDown")]
    pub direction: MoveDirection,
}
