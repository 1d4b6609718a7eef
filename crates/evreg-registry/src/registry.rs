//! # Evidence Registry
//!
//! The record store and the per-submitter index, kept behind one
//! `parking_lot::RwLock` so that every mutation is a single critical
//! section:
//!
//! - `submit` checks uniqueness, inserts the record and appends to the
//!   submitter's index under one write guard. Two racing submissions of the
//!   same id cannot both succeed.
//! - `update` checks existence, then ownership, then writes, under one write
//!   guard. A rejected update changes nothing.
//! - Reads take the read guard and hand out clones.
//!
//! `parking_lot` locks do not poison, so a panic elsewhere never turns the
//! registry into a permanent error source. The lock is never held across an
//! `.await` point because no method here is async.

use std::collections::HashMap;
use std::sync::Arc;

use evreg_core::{Clock, ContentHash, EvidenceId, SubmitterId, SystemClock};
use parking_lot::RwLock;

use crate::error::RegistryError;
use crate::record::{EvidenceRecord, NewEvidence, UserEvidenceIndex};

/// Both views of the registry. Only ever touched through the lock.
#[derive(Debug, Default)]
pub(crate) struct RegistryState {
    pub(crate) records: HashMap<EvidenceId, EvidenceRecord>,
    pub(crate) index: HashMap<SubmitterId, UserEvidenceIndex>,
}

/// Thread-safe evidence registry.
///
/// Share between tasks with `Arc<EvidenceRegistry>`; every method takes
/// `&self`.
pub struct EvidenceRegistry {
    state: RwLock<RegistryState>,
    clock: Arc<dyn Clock>,
}

impl EvidenceRegistry {
    /// Create an empty registry stamping submissions with wall-clock time.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty registry using `clock` for submission dates.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::from_state(RegistryState::default(), clock)
    }

    pub(crate) fn from_state(state: RegistryState, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(state),
            clock,
        }
    }

    pub(crate) fn read_state(&self) -> parking_lot::RwLockReadGuard<'_, RegistryState> {
        self.state.read()
    }

    /// Register a new piece of evidence on behalf of `caller`.
    ///
    /// The record is stamped with the registry clock and its id appended to
    /// the caller's index entry, created on first submission.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyExists`] if a record already occupies
    /// `evidence.id`. Nothing is written in that case.
    pub fn submit(
        &self,
        caller: &SubmitterId,
        evidence: NewEvidence,
    ) -> Result<EvidenceId, RegistryError> {
        let mut state = self.state.write();

        if state.records.contains_key(&evidence.id) {
            tracing::warn!(
                evidence_id = %evidence.id,
                caller = %caller,
                "rejected submission: id already registered"
            );
            return Err(RegistryError::AlreadyExists { id: evidence.id });
        }

        let id = evidence.id.clone();
        let record = evidence.into_record(caller.clone(), self.clock.now());
        let evidence_type = record.evidence_type.clone();

        state.records.insert(id.clone(), record);
        state
            .index
            .entry(caller.clone())
            .or_insert_with(|| UserEvidenceIndex::new(caller.clone()))
            .evidence_ids
            .push(id.clone());

        tracing::info!(
            evidence_id = %id,
            submitter = %caller,
            evidence_type = %evidence_type,
            "evidence submitted"
        );
        Ok(id)
    }

    /// Replace the description and locator of a record owned by `caller`.
    ///
    /// Existence is checked before ownership, so probing an unknown id
    /// reports `NotFound` whoever the caller is.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotFound`] if no record exists at `id`.
    /// - [`RegistryError::Unauthorized`] if `caller` is not the submitter.
    pub fn update(
        &self,
        caller: &SubmitterId,
        id: &EvidenceId,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.write();

        let record = state
            .records
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound { id: id.clone() })?;

        if &record.submitter != caller {
            tracing::warn!(
                evidence_id = %id,
                caller = %caller,
                "rejected update: caller is not the submitter"
            );
            return Err(RegistryError::Unauthorized {
                id: id.clone(),
                caller: caller.clone(),
            });
        }

        record.description = description.into();
        record.url = url.into();

        tracing::info!(evidence_id = %id, submitter = %caller, "evidence updated");
        Ok(())
    }

    /// The stored record at `id`, if any.
    pub fn get_evidence_details(&self, id: &EvidenceId) -> Option<EvidenceRecord> {
        self.state.read().records.get(id).cloned()
    }

    /// The index entry of `submitter`, if they have ever submitted.
    pub fn get_user_evidence(&self, submitter: &SubmitterId) -> Option<UserEvidenceIndex> {
        self.state.read().index.get(submitter).cloned()
    }

    /// Whether `candidate` is exactly the hash recorded for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no record exists at `id`.
    pub fn verify_evidence_hash(
        &self,
        id: &EvidenceId,
        candidate: &ContentHash,
    ) -> Result<bool, RegistryError> {
        let state = self.state.read();
        let record = state
            .records
            .get(id)
            .ok_or_else(|| RegistryError::NotFound { id: id.clone() })?;

        let matches = record.content_hash.matches(candidate);
        tracing::debug!(evidence_id = %id, matches, "evidence hash verified");
        Ok(matches)
    }

    /// Whether a record exists at `id`.
    pub fn contains(&self, id: &EvidenceId) -> bool {
        self.state.read().records.contains_key(id)
    }

    /// Number of records in the registry.
    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    /// Whether the registry holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EvidenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EvidenceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("EvidenceRegistry")
            .field("records", &state.records.len())
            .field("submitters", &state.index.len())
            .finish()
    }
}
