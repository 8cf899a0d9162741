//! Constants used throughout the tokenlist library.
//!
//! This module provides central definitions for token sizing and other
//! fixed values shared between the registry, collections and their callers.

/// Number of random bytes drawn for every collection token.
pub const TOKEN_BYTES: usize = 16;

/// Length of a hex-encoded collection token.
pub const TOKEN_LEN: usize = TOKEN_BYTES * 2;

/// Number of token characters included in log output.
///
/// A token is a credential, so only this prefix ever reaches the logs.
pub const TOKEN_LOG_PREFIX: usize = 8;

/// The id handed to the first item created by a registry.
pub const FIRST_ITEM_ID: u64 = 0;

/// How many tokens `Registry::create` draws before giving up on collisions.
pub const MAX_TOKEN_ATTEMPTS: usize = 4;
