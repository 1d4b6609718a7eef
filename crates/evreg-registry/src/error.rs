//! # Registry Error Types
//!
//! Every variant is recoverable and leaves the registry exactly as it was
//! before the failed call.

use evreg_core::{EvidenceId, SubmitterId};
use thiserror::Error;

/// Errors arising from registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A record already occupies the requested id.
    #[error("evidence {id} already exists")]
    AlreadyExists {
        /// The colliding identifier.
        id: EvidenceId,
    },

    /// No record exists at the requested id.
    #[error("evidence {id} not found")]
    NotFound {
        /// The missing identifier.
        id: EvidenceId,
    },

    /// The caller is not the submitter of the record.
    #[error("caller {caller} is not the submitter of evidence {id}")]
    Unauthorized {
        /// The record the caller tried to mutate.
        id: EvidenceId,
        /// The rejected caller.
        caller: SubmitterId,
    },

    /// A snapshot violates a registry invariant and cannot be restored.
    #[error("corrupt registry snapshot: {0}")]
    CorruptSnapshot(String),
}
