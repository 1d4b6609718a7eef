//! # Content Hashes
//!
//! [`ContentHash`] holds the digest a submitter recorded for a piece of
//! evidence. The registry never computes digests and never interprets the
//! encoding: `0x`-prefixed hex, bare hex, base64 and multihash strings are
//! all stored verbatim.
//!
//! ## Security Invariant
//!
//! Two hashes match only if their byte representations are identical. There
//! is no case folding, prefix stripping or partial matching. The comparison
//! runs in constant time over the shorter input so a verifier cannot learn
//! how much of a guessed hash was correct.

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

/// An opaque content digest, compared only for exact equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Wrap a digest string. No format validation is applied.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the digest string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `candidate` is byte-for-byte identical to this hash.
    pub fn matches(&self, candidate: &ContentHash) -> bool {
        let stored = self.0.as_bytes();
        let candidate = candidate.0.as_bytes();
        if stored.len() != candidate.len() {
            // Dummy comparison to keep timing independent of the length check.
            let _ = stored.ct_eq(stored);
            return false;
        }
        stored.ct_eq(candidate).into()
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentHash {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContentHash {
    fn from(value: String) -> Self {
        Self(value)
    }
}
