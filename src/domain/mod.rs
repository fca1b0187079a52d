//! Shared data model layer (structs/constants only).
//!
//! ## Files
//! - `models.rs` — badge documents, catalog snapshot, store records, config.
//! - `constants.rs` — fixed file names and commit-message markers.
//!
//! ## Rule of thumb
//! Domain types are data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! Document structs serialize to the hosted Open Badges files. Field names and
//! order are part of the published format; see `docs/contracts/*`.

pub mod constants;
pub mod models;
