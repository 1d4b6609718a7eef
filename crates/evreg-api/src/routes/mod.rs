//! # API Route Modules
//!
//! - `evidence` — submission, owner-only update, lookup, per-submitter
//!   listing and content-hash verification.

pub mod evidence;
