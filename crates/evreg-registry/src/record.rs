//! # Evidence Records
//!
//! The stored shape of a submission and of the per-submitter index.
//!
//! ## Mutability
//!
//! Only `description` and `url` change after submission, and only through
//! [`EvidenceRegistry::update`](crate::EvidenceRegistry::update). The fields
//! are public for reading; callers receive clones, so mutating a returned
//! record never touches registry state.

use evreg_core::{ContentHash, EvidenceId, SubmitterId, Timestamp};
use serde::{Deserialize, Serialize};

/// One submitted item of evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    /// Caller-supplied identifier, unique across the registry.
    pub id: EvidenceId,
    /// Identity that created the record. Sole party allowed to update it.
    pub submitter: SubmitterId,
    /// Free-form description. Mutable by the submitter.
    pub description: String,
    /// Digest of the evidentiary content as recorded at submission.
    pub content_hash: ContentHash,
    /// Free-form classification tag, e.g. "image" or "document".
    pub evidence_type: String,
    /// Locator of the underlying content. Mutable by the submitter.
    pub url: String,
    /// When the record was created.
    pub submission_date: Timestamp,
}

/// The caller-supplied fields of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvidence {
    /// Identifier to register the evidence under.
    pub id: EvidenceId,
    /// Free-form description.
    pub description: String,
    /// Digest of the evidentiary content.
    pub content_hash: ContentHash,
    /// Classification tag.
    pub evidence_type: String,
    /// Locator of the underlying content.
    pub url: String,
}

impl NewEvidence {
    pub(crate) fn into_record(
        self,
        submitter: SubmitterId,
        submission_date: Timestamp,
    ) -> EvidenceRecord {
        EvidenceRecord {
            id: self.id,
            submitter,
            description: self.description,
            content_hash: self.content_hash,
            evidence_type: self.evidence_type,
            url: self.url,
            submission_date,
        }
    }
}

/// Ordered list of the ids one submitter has registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEvidenceIndex {
    /// The submitter this entry belongs to.
    pub submitter: SubmitterId,
    /// Ids in submission order.
    pub evidence_ids: Vec<EvidenceId>,
}

impl UserEvidenceIndex {
    pub(crate) fn new(submitter: SubmitterId) -> Self {
        Self {
            submitter,
            evidence_ids: Vec::new(),
        }
    }

    /// Number of records this submitter has registered.
    pub fn len(&self) -> usize {
        self.evidence_ids.len()
    }

    /// Whether the entry lists no ids.
    pub fn is_empty(&self) -> bool {
        self.evidence_ids.is_empty()
    }

    /// Whether `id` was registered by this submitter.
    pub fn contains(&self, id: &EvidenceId) -> bool {
        self.evidence_ids.contains(id)
    }
}
