//! # evreg-registry — Evidence Registry Core
//!
//! Owns every piece of behavior that makes the registry trustworthy:
//!
//! - **Registry** ([`registry`]): submission with global id uniqueness,
//!   submitter-gated updates of description and locator, exact content-hash
//!   verification, and the per-submitter index.
//!
//! - **Records** ([`record`]): the stored [`EvidenceRecord`] and the
//!   [`UserEvidenceIndex`] entry kept for each submitter.
//!
//! - **Snapshots** ([`snapshot`]): consistent serializable copies of the
//!   whole registry, and invariant-checked restoration from them.
//!
//! - **Snapshot files** ([`file`]): atomic JSON persistence of snapshots
//!   for the API server and the CLI, plus a cross-process store lock.
//!
//! ## Crate Policy
//!
//! - Depends only on `evreg-core` internally.
//! - Registry operations never perform I/O. Only [`file`] touches the
//!   filesystem, and only when a caller asks it to.
//! - Transport and authentication belong to callers.
//! - Records and index share one lock; no reader sees one without the other.

pub mod error;
pub mod file;
pub mod record;
pub mod registry;
pub mod snapshot;

// Re-export primary types.
pub use error::RegistryError;
pub use file::{load_registry, save_registry, SnapshotFileError, StoreLock};
pub use record::{EvidenceRecord, NewEvidence, UserEvidenceIndex};
pub use registry::EvidenceRegistry;
pub use snapshot::{RegistrySnapshot, SNAPSHOT_VERSION};
