//! # Registry Snapshots
//!
//! A [`RegistrySnapshot`] is a consistent copy of both registry views taken
//! under one read guard. Persistence layers serialize it however they like
//! (the CLI and API use JSON) and hand it back to
//! [`EvidenceRegistry::from_snapshot`] on restart.
//!
//! Restoration re-checks every registry invariant. A snapshot edited by
//! hand or truncated on disk is rejected with
//! [`RegistryError::CorruptSnapshot`] instead of producing a registry whose
//! index disagrees with its records.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use evreg_core::{Clock, EvidenceId, SubmitterId};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::record::{EvidenceRecord, UserEvidenceIndex};
use crate::registry::{EvidenceRegistry, RegistryState};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable copy of the whole registry.
///
/// Records are sorted by id and index entries by submitter so identical
/// registries produce identical snapshots. Each entry keeps its ids in
/// submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Format version, see [`SNAPSHOT_VERSION`].
    pub version: u32,
    /// Every stored record.
    pub records: Vec<EvidenceRecord>,
    /// Every per-submitter index entry.
    pub submitters: Vec<UserEvidenceIndex>,
}

impl Default for RegistrySnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            records: Vec::new(),
            submitters: Vec::new(),
        }
    }
}

impl EvidenceRegistry {
    /// Take a consistent copy of the registry.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.read_state();

        let mut records: Vec<EvidenceRecord> = state.records.values().cloned().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));

        let mut submitters: Vec<UserEvidenceIndex> = state.index.values().cloned().collect();
        submitters.sort_by(|a, b| a.submitter.cmp(&b.submitter));

        RegistrySnapshot {
            version: SNAPSHOT_VERSION,
            records,
            submitters,
        }
    }

    /// Rebuild a registry from a snapshot, using `clock` for new submissions.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CorruptSnapshot`] if the version is unknown,
    /// an id or submitter appears twice, an index entry is empty or names a
    /// record that is missing or owned by someone else, or a record is
    /// missing from its submitter's index.
    pub fn from_snapshot(
        snapshot: RegistrySnapshot,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, RegistryError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(RegistryError::CorruptSnapshot(format!(
                "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                snapshot.version
            )));
        }

        let mut records: HashMap<EvidenceId, EvidenceRecord> =
            HashMap::with_capacity(snapshot.records.len());
        for record in snapshot.records {
            let id = record.id.clone();
            if records.insert(id.clone(), record).is_some() {
                return Err(corrupt(format!("evidence {id} appears more than once")));
            }
        }

        let mut index: HashMap<SubmitterId, UserEvidenceIndex> =
            HashMap::with_capacity(snapshot.submitters.len());
        let mut indexed: HashSet<EvidenceId> = HashSet::with_capacity(records.len());
        for entry in snapshot.submitters {
            if entry.is_empty() {
                return Err(corrupt(format!(
                    "index entry for {} lists no evidence",
                    entry.submitter
                )));
            }
            for id in &entry.evidence_ids {
                let record = records.get(id).ok_or_else(|| {
                    corrupt(format!(
                        "index entry for {} names unknown evidence {id}",
                        entry.submitter
                    ))
                })?;
                if record.submitter != entry.submitter {
                    return Err(corrupt(format!(
                        "evidence {id} is indexed under {} but was submitted by {}",
                        entry.submitter, record.submitter
                    )));
                }
                if !indexed.insert(id.clone()) {
                    return Err(corrupt(format!("evidence {id} is indexed more than once")));
                }
            }
            let submitter = entry.submitter.clone();
            if index.insert(submitter.clone(), entry).is_some() {
                return Err(corrupt(format!(
                    "submitter {submitter} has more than one index entry"
                )));
            }
        }

        if let Some(orphan) = records.keys().find(|id| !indexed.contains(*id)) {
            return Err(corrupt(format!(
                "evidence {orphan} is missing from its submitter's index"
            )));
        }

        tracing::info!(
            records = records.len(),
            submitters = index.len(),
            "registry restored from snapshot"
        );
        Ok(Self::from_state(RegistryState { records, index }, clock))
    }
}

fn corrupt(reason: String) -> RegistryError {
    RegistryError::CorruptSnapshot(reason)
}
