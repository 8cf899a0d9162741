//! Collection token type.
//!
//! A `Token` is the 32-character lowercase hex encoding of 16 random bytes.
//! It identifies a collection and is, at the same time, the only credential
//! needed to access it.

use serde::{Deserialize, Serialize};

use crate::constants::{TOKEN_BYTES, TOKEN_LEN, TOKEN_LOG_PREFIX};
use crate::entropy::EntropySource;
use crate::registry::RegistryError;

/// Identifier and access credential of a collection.
///
/// Construct one with [`Token::generate`] (new collections) or
/// [`Token::parse`] (caller-supplied strings).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Draws [`TOKEN_BYTES`] bytes from `entropy` and hex-encodes them.
    pub fn generate(entropy: &dyn EntropySource) -> Result<Self, RegistryError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        entropy
            .fill(&mut bytes)
            .map_err(|source| RegistryError::RandomSource { source })?;
        Ok(Self(hex::encode(bytes)))
    }

    /// Checks that `s` is shaped like a token: exactly [`TOKEN_LEN`] lowercase
    /// hex characters.
    ///
    /// A well-formed token is not necessarily a known one; use
    /// [`Registry::validate`](crate::Registry::validate) for that.
    pub fn parse(s: &str) -> Result<Self, RegistryError> {
        let well_formed = s.len() == TOKEN_LEN
            && s
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !well_formed {
            return Err(RegistryError::MalformedToken {
                len: s.len(),
            });
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix that is safe to put in log lines.
    pub fn log_prefix(&self) -> &str {
        &self.0[..TOKEN_LOG_PREFIX.min(self.0.len())]
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &self.0)
    }
}

impl std::borrow::Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
