//! # evreg-cli — CLI Tool for the Evidence Registry
//!
//! Provides the `evreg` command-line interface over a registry persisted
//! as a JSON snapshot file.
//!
//! ## Subcommands
//!
//! - `evreg submit` — register new evidence as `--caller`.
//! - `evreg update` — replace description and url (submitter only).
//! - `evreg show` — print one record as JSON.
//! - `evreg list` — print a submitter's evidence ids, oldest first.
//! - `evreg verify` — compare a hash with the record (exit 0 match, 2 mismatch).
//!
//! ```bash
//! evreg --store claims.json submit --caller alice --id evidence-123 \
//!     --description "Screenshot" --hash 0x1234 --type image --url https://example.com/e.png
//! evreg --store claims.json verify --id evidence-123 --hash 0x1234
//! ```
//!
//! A missing store file is an empty registry. Mutating commands write the
//! store back atomically; read-only commands never touch it.

pub mod evidence;

/// Default snapshot file when `--store` is not given.
pub const DEFAULT_STORE: &str = "evidence-registry.json";

/// Exit code for a hash that does not match the record.
pub const EXIT_MISMATCH: u8 = 2;
