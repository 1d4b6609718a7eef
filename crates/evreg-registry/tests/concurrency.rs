//! # Concurrent Access Tests
//!
//! Races many threads against one shared registry and checks that the
//! uniqueness, ownership and index invariants hold afterwards.

use std::sync::{Arc, Barrier};
use std::thread;

use evreg_core::{ContentHash, EvidenceId, SubmitterId};
use evreg_registry::{EvidenceRegistry, NewEvidence, RegistryError};

const THREADS: usize = 16;

fn evidence(id: &str, hash: &str) -> NewEvidence {
    NewEvidence {
        id: EvidenceId::new(id),
        description: format!("submitted with {hash}"),
        content_hash: ContentHash::new(hash),
        evidence_type: "document".to_string(),
        url: format!("https://example.com/{id}"),
    }
}

#[test]
fn racing_submissions_of_one_id_have_exactly_one_winner() {
    let registry = Arc::new(EvidenceRegistry::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let caller = SubmitterId::new(format!("caller-{i}"));
                barrier.wait();
                let result = registry.submit(&caller, evidence("contested", &format!("0x{i:02x}")));
                (caller, result)
            })
        })
        .collect();

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners: Vec<_> = outcomes.iter().filter(|(_, r)| r.is_ok()).collect();
    assert_eq!(winners.len(), 1, "exactly one submission must succeed");

    for (_, result) in outcomes.iter().filter(|(_, r)| r.is_err()) {
        assert!(matches!(result, Err(RegistryError::AlreadyExists { .. })));
    }

    let (winner, _) = winners[0];
    let record = registry
        .get_evidence_details(&EvidenceId::new("contested"))
        .unwrap();
    assert_eq!(&record.submitter, winner);
    assert_eq!(record.description, format!("submitted with {}", record.content_hash));

    // Only the winner has an index entry.
    for (caller, result) in &outcomes {
        assert_eq!(registry.get_user_evidence(caller).is_some(), result.is_ok());
    }
}

#[test]
fn concurrent_distinct_submissions_keep_index_consistent() {
    const PER_THREAD: usize = 50;
    let registry = Arc::new(EvidenceRegistry::new());
    let shared = SubmitterId::new("shared-submitter");

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let registry = Arc::clone(&registry);
            let shared = shared.clone();
            thread::spawn(move || {
                for n in 0..PER_THREAD {
                    let id = format!("t{t}-n{n}");
                    registry.submit(&shared, evidence(&id, "0xaa")).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(registry.len(), THREADS * PER_THREAD);
    let entry = registry.get_user_evidence(&shared).unwrap();
    assert_eq!(entry.len(), THREADS * PER_THREAD);

    // Each thread's ids appear in the order that thread submitted them.
    for t in 0..THREADS {
        let prefix = format!("t{t}-");
        let mine: Vec<usize> = entry
            .evidence_ids
            .iter()
            .filter_map(|id| id.as_str().strip_prefix(&prefix))
            .map(|n| n.trim_start_matches('n').parse().unwrap())
            .collect();
        assert_eq!(mine, (0..PER_THREAD).collect::<Vec<_>>());
    }
}

#[test]
fn concurrent_owner_updates_never_mix_fields() {
    let registry = Arc::new(EvidenceRegistry::new());
    let owner = SubmitterId::new("owner");
    let id = registry.submit(&owner, evidence("shared", "0x01")).unwrap();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            let owner = owner.clone();
            let id = id.clone();
            thread::spawn(move || {
                barrier.wait();
                for round in 0..100 {
                    let tag = format!("{i}-{round}");
                    registry
                        .update(&owner, &id, format!("desc-{tag}"), format!("url-{tag}"))
                        .unwrap();
                    let seen = registry.get_evidence_details(&id).unwrap();
                    let d = seen.description.strip_prefix("desc-").unwrap();
                    let u = seen.url.strip_prefix("url-").unwrap();
                    assert_eq!(d, u, "description and url come from different updates");
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let record = registry.get_evidence_details(&id).unwrap();
    assert_eq!(record.content_hash, ContentHash::new("0x01"));
    assert_eq!(record.submitter, owner);
}

#[test]
fn concurrent_intruders_never_change_a_record() {
    let registry = Arc::new(EvidenceRegistry::new());
    let owner = SubmitterId::new("owner");
    let id = registry.submit(&owner, evidence("guarded", "0x01")).unwrap();
    let before = registry.get_evidence_details(&id).unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let id = id.clone();
            thread::spawn(move || {
                let intruder = SubmitterId::new(format!("intruder-{i}"));
                for _ in 0..50 {
                    let err = registry.update(&intruder, &id, "tampered", "bad").unwrap_err();
                    assert!(matches!(err, RegistryError::Unauthorized { .. }));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(registry.get_evidence_details(&id).unwrap(), before);
}

#[test]
fn snapshots_taken_during_writes_always_restore() {
    let registry = Arc::new(EvidenceRegistry::new());
    let writer = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for n in 0..200 {
                let who = SubmitterId::new(format!("s{}", n % 7));
                registry
                    .submit(&who, evidence(&format!("id-{n}"), "0xff"))
                    .unwrap();
            }
        })
    };

    for _ in 0..50 {
        let snap = registry.snapshot();
        let restored =
            EvidenceRegistry::from_snapshot(snap, Arc::new(evreg_core::SystemClock)).unwrap();
        assert!(restored.len() <= 200);
    }
    writer.join().unwrap();
    assert_eq!(registry.len(), 200);
}
