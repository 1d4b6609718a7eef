//! # Evidence Subcommands
//!
//! Each invocation loads the registry from the store file, runs exactly one
//! registry operation, and for mutations writes the store back. Mutations
//! hold the store lock from load to write, so concurrent invocations
//! against one store apply one after another.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use evreg_core::{ContentHash, EvidenceId, SubmitterId, SystemClock};
use evreg_registry::{load_registry, save_registry, EvidenceRegistry, NewEvidence, StoreLock};

use crate::EXIT_MISMATCH;

/// Evidence subcommands.
#[derive(Subcommand, Debug)]
pub enum EvidenceCommand {
    /// Register new evidence.
    Submit {
        /// Identity submitting the evidence.
        #[arg(long)]
        caller: String,
        /// Evidence identifier. Must be unused.
        #[arg(long)]
        id: String,
        /// Free-text description.
        #[arg(long, default_value = "")]
        description: String,
        /// Content hash, recorded verbatim.
        #[arg(long)]
        hash: String,
        /// Classification tag (e.g., "image", "document").
        #[arg(long = "type", value_name = "TYPE", default_value = "")]
        evidence_type: String,
        /// Locator of the underlying content.
        #[arg(long, default_value = "")]
        url: String,
    },

    /// Replace the description and url of evidence you submitted.
    Update {
        /// Identity requesting the change. Must be the submitter.
        #[arg(long)]
        caller: String,
        /// Evidence identifier.
        #[arg(long)]
        id: String,
        /// New description.
        #[arg(long)]
        description: String,
        /// New content locator.
        #[arg(long)]
        url: String,
    },

    /// Print one evidence record as JSON.
    Show {
        /// Evidence identifier.
        #[arg(long)]
        id: String,
    },

    /// Print the evidence ids a submitter has registered, oldest first.
    List {
        /// Submitter identity.
        #[arg(long)]
        submitter: String,
    },

    /// Check a hash against the recorded one. Exits 2 on mismatch.
    Verify {
        /// Evidence identifier.
        #[arg(long)]
        id: String,
        /// Candidate hash, compared byte-for-byte.
        #[arg(long)]
        hash: String,
    },
}

impl EvidenceCommand {
    fn mutates(&self) -> bool {
        matches!(self, Self::Submit { .. } | Self::Update { .. })
    }
}

/// Execute one evidence subcommand against the store at `store`.
///
/// Returns the process exit code on success.
pub fn run_evidence(command: &EvidenceCommand, store: &Path) -> Result<u8> {
    let _lock = if command.mutates() {
        Some(
            StoreLock::exclusive(store)
                .with_context(|| format!("failed to lock store {}", store.display()))?,
        )
    } else {
        None
    };
    let registry = open(store)?;

    match command {
        EvidenceCommand::Submit {
            caller,
            id,
            description,
            hash,
            evidence_type,
            url,
        } => {
            let caller = SubmitterId::validated(caller.as_str())?;
            let id = EvidenceId::validated(id.as_str())?;
            let id = registry.submit(
                &caller,
                NewEvidence {
                    id,
                    description: description.clone(),
                    content_hash: ContentHash::new(hash.as_str()),
                    evidence_type: evidence_type.clone(),
                    url: url.clone(),
                },
            )?;
            persist(&registry, store)?;
            println!("OK: submitted {id}");
            Ok(0)
        }

        EvidenceCommand::Update {
            caller,
            id,
            description,
            url,
        } => {
            let caller = SubmitterId::validated(caller.as_str())?;
            let id = EvidenceId::new(id.as_str());
            registry.update(&caller, &id, description.as_str(), url.as_str())?;
            persist(&registry, store)?;
            println!("OK: updated {id}");
            Ok(0)
        }

        EvidenceCommand::Show { id } => {
            let Some(record) = registry.get_evidence_details(&EvidenceId::new(id.as_str())) else {
                bail!("evidence {id} not found");
            };
            let json = serde_json::to_string_pretty(&record).context("serializing record")?;
            println!("{json}");
            Ok(0)
        }

        EvidenceCommand::List { submitter } => {
            let Some(index) = registry.get_user_evidence(&SubmitterId::new(submitter.as_str()))
            else {
                bail!("submitter {submitter} has no evidence");
            };
            for id in &index.evidence_ids {
                println!("{id}");
            }
            Ok(0)
        }

        EvidenceCommand::Verify { id, hash } => {
            let id = EvidenceId::new(id.as_str());
            let matches = registry.verify_evidence_hash(&id, &ContentHash::new(hash.as_str()))?;
            if matches {
                println!("MATCH: {id}");
                Ok(0)
            } else {
                println!("MISMATCH: {id}");
                Ok(EXIT_MISMATCH)
            }
        }
    }
}

fn open(store: &Path) -> Result<EvidenceRegistry> {
    let registry = load_registry(store, Arc::new(SystemClock))
        .with_context(|| format!("failed to open store {}", store.display()))?;
    tracing::debug!(store = %store.display(), records = registry.len(), "store opened");
    Ok(registry)
}

fn persist(registry: &EvidenceRegistry, store: &Path) -> Result<()> {
    save_registry(registry, store)
        .with_context(|| format!("failed to write store {}", store.display()))
}
