//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the two identifiers the registry deals in.
//! Each identifier is a distinct type: you cannot pass a [`SubmitterId`]
//! where an [`EvidenceId`] is expected.
//!
//! ## Opacity
//!
//! Both identifiers are caller-supplied strings. The registry compares them
//! for equality and hashes them as map keys; it never inspects their
//! structure. A submitter may be a DID, a chain principal, an email address
//! or anything else the authentication layer produces.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Caller-supplied identifier of an evidence record, unique across the
/// whole registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceId(String);

impl EvidenceId {
    /// Wrap a string as an evidence identifier. No validation is applied.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Wrap a string, rejecting values that are empty after trimming.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyEvidenceId`] for blank input.
    pub fn validated(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::EmptyEvidenceId);
        }
        Ok(Self(s))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EvidenceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EvidenceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Opaque identity of a caller, as established by an external
/// authentication layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmitterId(String);

impl SubmitterId {
    /// Wrap a string as a submitter identity. No validation is applied.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Wrap a string, rejecting values that are empty after trimming.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySubmitterId`] for blank input.
    pub fn validated(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::EmptySubmitterId);
        }
        Ok(Self(s))
    }

    /// Access the identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubmitterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubmitterId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SubmitterId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
