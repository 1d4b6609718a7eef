//! # Validation Errors
//!
//! Errors raised by the optional `validated` constructors on identifier
//! newtypes. The registry itself never produces these: it accepts every
//! value as-is. Collaborator layers (HTTP, CLI) use them to reject blank
//! input before it reaches the registry.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Evidence identifier is empty or whitespace only.
    #[error("invalid evidence ID: must be non-empty")]
    EmptyEvidenceId,

    /// Submitter identity is empty or whitespace only.
    #[error("invalid submitter identity: must be non-empty")]
    EmptySubmitterId,
}
