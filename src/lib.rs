//! Open Badges issuing backed by a git-hosted repository.
//!
//! The repository is the only source of truth. [`initialize`] reads its tree
//! and commit history, rebuilds a [`Catalog`] snapshot, and returns a
//! [`Badges`] handle whose create operations append new files, one commit per
//! file:
//!
//! ```text
//! /award.html  /issuer.json  /img.png
//! /<Class>/class.json  /<Class>/img.png  /<Class>/<uid>.json
//! ```
//!
//! ## Modules
//! - `domain` — documents, catalog, store records, constants.
//! - `store` — the [`RemoteStore`] seam and its GitHub/directory/memory backends.
//! - `services` — reconciliation, document building, the issuance workflow,
//!   and CLI-side helpers (config, audit log, output).

pub mod domain;
pub mod services;
pub mod store;

pub use domain::models::{
    Assertion, BadgeInput, BadgesConfig, Catalog, ClassDocument, ClassEntry, ClassInput,
    CommitRecord, IssuerDocument, IssuerInput, TreeEntry, WriteReceipt,
};
pub use services::catalog::{reconcile, CatalogError};
pub use services::issuance::{initialize, BadgeError, Badges};
pub use store::{
    DirStore, GitHubStore, GitHubStoreConfig, MemoryStore, RemoteStore, StoreError,
};
