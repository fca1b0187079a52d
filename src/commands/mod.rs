//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `catalog.rs` — status/classes/badges (read-only views of the snapshot).
//! - `issue.rs` — issuer/class/badge create flows.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `badger::services`.
//! - Keep behavior and output schema stable (`docs/contracts/*`).

pub mod catalog;
pub mod issue;

pub use catalog::handle_catalog_commands;
pub use issue::handle_issue_commands;
