//! Registry of all collections.
//!
//! The registry issues tokens, owns every [`Collection`] and resolves tokens
//! back to them. It is an explicit value: construct one at startup and share
//! it (usually behind an `Arc`) with whatever serves requests.
//!
//! The collection map has its own `RwLock`, independent of each collection's
//! chain lock. `resolve` clones the collection's `Arc` and releases the map
//! lock before returning, so item operations never run under it.

pub mod errors;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, PoisonError, RwLock};

use crate::Result;
use crate::collection::Collection;
use crate::constants::{MAX_TOKEN_ATTEMPTS, TOKEN_LOG_PREFIX};
use crate::entropy::{EntropySource, OsEntropy};
use crate::item::IdSequence;
use crate::token::Token;

pub use errors::RegistryError;

/// Owner of all collections, keyed by token.
///
/// Tokens are never revoked: once `create` returns a token, `validate` and
/// `resolve` accept it for the lifetime of the registry.
#[derive(Debug)]
pub struct Registry {
    collections: RwLock<HashMap<Token, Arc<Collection>>>,
    ids: Arc<IdSequence>,
    entropy: Arc<dyn EntropySource>,
}

impl Registry {
    /// Creates an empty registry drawing tokens from the OS.
    pub fn new() -> Self {
        Self::with_entropy(Arc::new(OsEntropy))
    }

    /// Creates an empty registry drawing tokens from `entropy`.
    pub fn with_entropy(entropy: Arc<dyn EntropySource>) -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            ids: Arc::new(IdSequence::new()),
            entropy,
        }
    }

    /// Creates a new, empty collection and returns its token.
    ///
    /// # Errors
    /// Returns a random source error if the entropy source fails. The call is
    /// not retried; callers should report it as a server-side failure.
    pub fn create(&self) -> Result<Token> {
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let token = Token::generate(self.entropy.as_ref()).inspect_err(|err| {
                tracing::error!(error = %err, "Failed to draw a collection token");
            })?;

            if self.insert_new(&token) {
                tracing::info!(token = %token.log_prefix(), "Collection created");
                return Ok(token);
            }
            tracing::warn!(
                token = %token.log_prefix(),
                "Drawn token collides with an issued one; drawing again"
            );
        }

        tracing::error!(
            attempts = MAX_TOKEN_ATTEMPTS,
            "Random source keeps producing issued tokens"
        );
        Err(RegistryError::TokenSpaceExhausted {
            attempts: MAX_TOKEN_ATTEMPTS,
        }
        .into())
    }

    /// Inserts an empty collection under `token` unless the token is taken.
    ///
    /// The map lock is released on return, before any logging happens.
    fn insert_new(&self, token: &Token) -> bool {
        // The map only ever sees single inserts and lookups, so a poisoned
        // lock still guards a consistent map.
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match collections.entry(token.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Collection::new(token.clone(), self.ids.clone())));
                true
            }
        }
    }

    /// Reports whether a collection with exactly this token exists.
    pub fn validate(&self, token: &str) -> bool {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(token)
    }

    /// Returns the collection for `token`.
    ///
    /// Accepts exactly the tokens for which [`validate`](Self::validate)
    /// returns `true`.
    pub fn resolve(&self, token: &str) -> Result<Arc<Collection>> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        collections.get(token).cloned().ok_or_else(|| {
            RegistryError::CollectionNotFound {
                token_prefix: token.chars().take(TOKEN_LOG_PREFIX).collect(),
            }
            .into()
        })
    }

    /// Number of collections issued so far.
    pub fn len(&self) -> usize {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if no collection was created yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
