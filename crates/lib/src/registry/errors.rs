//! Error types for the collection registry.

use thiserror::Error;

/// Errors that can occur while creating or resolving collections.
///
/// Full tokens never appear in these errors, only the short log prefix,
/// because a token is a credential.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No collection was ever issued for this token.
    #[error("Collection not found for token {token_prefix}…")]
    CollectionNotFound {
        /// Leading characters of the unknown token
        token_prefix: String,
    },

    /// The string is not shaped like a token.
    #[error("Malformed token: expected 32 lowercase hex characters, got {len} characters")]
    MalformedToken {
        /// Length of the rejected string in bytes
        len: usize,
    },

    /// The secure random source failed while drawing a token.
    #[error("Secure random source failed")]
    RandomSource {
        /// The underlying random source error
        #[source]
        source: rand::Error,
    },

    /// Every drawn token collided with an issued one.
    ///
    /// With a healthy source this cannot happen in practice; it means the
    /// source keeps returning the same bytes.
    #[error("Random source produced {attempts} colliding tokens in a row")]
    TokenSpaceExhausted {
        /// Number of draws attempted
        attempts: usize,
    },
}

impl RegistryError {
    /// Check if this error indicates an unknown token.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::CollectionNotFound { .. })
    }

    /// Check if this error indicates a badly shaped token.
    pub fn is_malformed_token(&self) -> bool {
        matches!(self, RegistryError::MalformedToken { .. })
    }

    /// Check if this error is a failure of the random source.
    pub fn is_random_source_error(&self) -> bool {
        matches!(
            self,
            RegistryError::RandomSource { .. } | RegistryError::TokenSpaceExhausted { .. }
        )
    }
}

// Conversion from RegistryError to the main Error type
impl From<RegistryError> for crate::Error {
    fn from(err: RegistryError) -> Self {
        crate::Error::Registry(err)
    }
}
