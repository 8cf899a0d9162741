//! Error types for collection operations.

use thiserror::Error;

use crate::item::ItemId;

/// Errors that can occur while reading or mutating a collection.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CollectionError {
    /// No item with this id is part of the collection (never was, or was removed).
    #[error("Item not found: {id}")]
    ItemNotFound {
        /// The id that was looked up
        id: ItemId,
    },

    /// A chain invariant was found broken.
    ///
    /// This indicates a defect, never a caller mistake. The operation that
    /// detected it was refused.
    #[error("Chain integrity violation: {reason}")]
    IntegrityViolation {
        /// Description of the broken invariant
        reason: String,
    },
}

impl CollectionError {
    /// Check if this error indicates an item was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CollectionError::ItemNotFound { .. })
    }

    /// Check if this error indicates a broken chain.
    pub fn is_integrity_error(&self) -> bool {
        matches!(self, CollectionError::IntegrityViolation { .. })
    }
}

// Conversion from CollectionError to the main Error type
impl From<CollectionError> for crate::Error {
    fn from(err: CollectionError) -> Self {
        crate::Error::Collection(err)
    }
}
