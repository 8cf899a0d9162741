//!
//! tokenlist: token-addressed, manually ordered item lists kept in memory.
//!
//! ## Core Concepts
//!
//! * **Registry (`registry::Registry`)**: Owns every collection. Issues unguessable tokens and resolves them back to collections.
//! * **Tokens (`token::Token`)**: 32 lowercase hex characters drawn from a secure random source. A token both names a collection and grants access to it.
//! * **Collections (`collection::Collection`)**: An ordered chain of items behind its own lock. New items go to the head; positions change only through explicit up/down swaps.
//! * **Items (`item::Item`)**: A small record (`name`, `text`, `done`, `category`) with a process-unique id and links to its neighbours.
//!
//! ```
//! use tokenlist::{ItemPayload, Registry};
//!
//! let registry = Registry::new();
//! let token = registry.create()?;
//! let list = registry.resolve(token.as_str())?;
//!
//! let milk = list.add(ItemPayload::named("Buy milk"))?;
//! let dog = list.add(ItemPayload::named("Walk dog"))?;
//! list.move_down(dog.id)?;
//!
//! let names: Vec<_> = list.get_all()?.into_iter().map(|item| item.name).collect();
//! assert_eq!(names, ["Buy milk", "Walk dog"]);
//! # let _ = milk;
//! # Ok::<(), tokenlist::Error>(())
//! ```

pub mod collection;
pub mod constants;
pub mod entropy;
pub mod item;
pub mod registry;
pub mod token;

pub use collection::{Collection, CollectionError};
pub use entropy::{EntropySource, OsEntropy};
#[cfg(any(test, feature = "testing"))]
pub use entropy::{FailingEntropy, FixedEntropy};
pub use item::{IdSequence, Item, ItemId, ItemPayload, ItemUpdate, MoveDirection};
pub use registry::{Registry, RegistryError};
pub use token::Token;

/// Result type used throughout the tokenlist library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the tokenlist library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured registry errors from the registry module
    #[error(transparent)]
    Registry(registry::RegistryError),

    /// Structured collection errors from the collection module
    #[error(transparent)]
    Collection(collection::CollectionError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Registry(_) => "registry",
            Error::Collection(_) => "collection",
        }
    }

    /// Check if this error indicates a token or item was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Registry(registry_err) => registry_err.is_not_found(),
            Error::Collection(collection_err) => collection_err.is_not_found(),
        }
    }

    /// Check if this error indicates a broken chain invariant.
    pub fn is_integrity_error(&self) -> bool {
        match self {
            Error::Collection(collection_err) => collection_err.is_integrity_error(),
            _ => false,
        }
    }

    /// Check if this error is a failure of the secure random source.
    pub fn is_random_source_error(&self) -> bool {
        match self {
            Error::Registry(registry_err) => registry_err.is_random_source_error(),
            _ => false,
        }
    }

    /// Check if this error indicates a badly shaped token.
    pub fn is_malformed_token(&self) -> bool {
        match self {
            Error::Registry(registry_err) => registry_err.is_malformed_token(),
            _ => false,
        }
    }
}
