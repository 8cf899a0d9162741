//! Entropy source abstraction
//!
//! Collection tokens double as access credentials, so they must be drawn from
//! a cryptographically secure source. This module provides an
//! [`EntropySource`] trait so production code reads from the operating system
//! while tests can use deterministic or deliberately failing sources.
//!
//! # Example
//!
//! ```
//! use tokenlist::{EntropySource, OsEntropy};
//!
//! let mut buf = [0u8; 16];
//! OsEntropy.fill(&mut buf).expect("OS entropy should be available");
//! ```

use std::fmt::Debug;

use rand::RngCore;
use rand::rngs::OsRng;

#[cfg(any(test, feature = "testing"))]
use std::sync::Mutex;

/// A source of random bytes for token generation.
///
/// Implementations must be safe to share between threads, since a single
/// registry serves every concurrent `create` call.
pub trait EntropySource: Send + Sync + Debug {
    /// Fill `dest` entirely with random bytes.
    ///
    /// Returns an error if the source is exhausted or unavailable. Callers
    /// treat this as fatal to the current operation and do not retry.
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error>;
}

/// Production entropy backed by the operating system's CSPRNG.
///
/// Uses [`rand::rngs::OsRng`], which reads directly from the platform
/// generator (e.g. `getrandom(2)` on Linux).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        OsRng.try_fill_bytes(dest)
    }
}

/// Deterministic entropy for tests.
///
/// Every call fills the whole buffer with one byte value. The value starts at
/// `seed` and advances by `step` after each call, so `step == 0` produces the
/// same bytes forever (useful for forcing token collisions).
///
/// ```rust,ignore
/// use tokenlist::{EntropySource, FixedEntropy};
///
/// let entropy = FixedEntropy::new(0x10);
/// let mut a = [0u8; 2];
/// let mut b = [0u8; 2];
/// entropy.fill(&mut a).unwrap();
/// entropy.fill(&mut b).unwrap();
/// assert_eq!(a, [0x10, 0x10]);
/// assert_eq!(b, [0x11, 0x11]);
/// ```
#[cfg(any(test, feature = "testing"))]
#[derive(Debug)]
pub struct FixedEntropy {
    next: Mutex<u8>,
    step: u8,
}

#[cfg(any(test, feature = "testing"))]
impl FixedEntropy {
    /// Create a source whose byte value increments after every fill.
    pub fn new(seed: u8) -> Self {
        Self {
            next: Mutex::new(seed),
            step: 1,
        }
    }

    /// Create a source that always yields `byte`.
    pub fn constant(byte: u8) -> Self {
        Self {
            next: Mutex::new(byte),
            step: 0,
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl EntropySource for FixedEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        let mut next = self.next.lock().unwrap();
        dest.fill(*next);
        *next = next.wrapping_add(self.step);
        Ok(())
    }
}

/// Entropy source that always fails, for exercising error paths.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingEntropy;

#[cfg(any(test, feature = "testing"))]
impl EntropySource for FailingEntropy {
    fn fill(&self, _dest: &mut [u8]) -> Result<(), rand::Error> {
        Err(rand::Error::new(std::io::Error::other(
            "entropy source unavailable",
        )))
    }
}
