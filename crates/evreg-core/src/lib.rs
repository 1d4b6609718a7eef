#![deny(missing_docs)]

//! # evreg-core — Foundational Types for the Evidence Registry
//!
//! This crate defines the domain primitives every other crate in the
//! workspace depends on. It has no internal crate dependencies.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** An [`EvidenceId`] cannot be
//!    passed where a [`SubmitterId`] is expected, even though both wrap a
//!    caller-supplied string.
//!
//! 2. **Opaque values.** Identifiers and [`ContentHash`] values carry no
//!    format rules inside the registry. Collaborator layers that want
//!    stricter input use the `validated` constructors, which only reject
//!    blank values.
//!
//! 3. **Time is injected.** Submission dates come from a [`Clock`]
//!    implementation handed to the registry, never from an ambient call.

pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use digest::ContentHash;
pub use error::ValidationError;
pub use identity::{EvidenceId, SubmitterId};
pub use temporal::{Clock, FixedClock, SystemClock, Timestamp};
