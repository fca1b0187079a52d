//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `catalog.rs` — reconcile a tree listing + history into a catalog.
//! - `documents.rs` — pure builders for issuer/class/assertion documents.
//! - `issuance.rs` — initialization and the issuer/class/badge create flows.
//! - `config.rs` — config.toml loading and flag/env resolution.
//! - `storage.rs` — local audit log.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod catalog;
pub mod config;
pub mod documents;
pub mod issuance;
pub mod output;
pub mod storage;
