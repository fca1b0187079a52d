use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// Resolved settings the issuance workflow runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgesConfig {
    pub user: String,
    pub repo: String,
    /// Public base URL the generated documents point at.
    pub storage: String,
    /// Pages of change history read during initialization.
    pub history_depth: u32,
}

/// `config.toml` as written by the user. Every field is optional so CLI flags
/// and environment variables can fill the gaps.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    pub user: Option<String>,
    pub repo: Option<String>,
    pub storage: Option<String>,
    pub token: Option<String>,
    pub history_depth: Option<u32>,
    pub timeout_ms: Option<u64>,
    pub api: Option<String>,
}

// ---- store records ----

/// One entry of a tree listing. Directories carry the names of their direct
/// file children only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TreeEntry {
    Leaf(String),
    Directory { name: String, children: Vec<String> },
}

impl TreeEntry {
    pub fn leaf(name: impl Into<String>) -> Self {
        TreeEntry::Leaf(name.into())
    }

    pub fn dir<I, S>(name: impl Into<String>, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TreeEntry::Directory {
            name: name.into(),
            children: children.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TreeEntry::Leaf(name) => name,
            TreeEntry::Directory { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub message: String,
}

impl CommitRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteReceipt {
    pub path: String,
    /// Commit identifier reported by the store, when it has one.
    pub commit: Option<String>,
}

// ---- catalog snapshot ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassEntry {
    pub name: String,
    pub badges: Vec<String>,
}

/// Snapshot of the repository taken at initialization. It is never refreshed
/// by the create operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Catalog {
    pub has_issuer: bool,
    pub classes: Vec<ClassEntry>,
}

impl Catalog {
    pub fn class(&self, name: &str) -> Option<&ClassEntry> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn class_names(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn badge_count(&self) -> usize {
        self.classes.iter().map(|c| c.badges.len()).sum()
    }
}

// ---- create inputs ----

#[derive(Debug, Clone)]
pub struct IssuerInput {
    pub name: String,
    pub url: String,
    pub description: String,
    /// Local image file uploaded as the issuer image.
    pub image: PathBuf,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct ClassInput {
    pub name: String,
    pub description: String,
    pub image: PathBuf,
    pub criteria: String,
}

#[derive(Debug, Clone)]
pub struct BadgeInput {
    /// Class segment, as listed in the catalog.
    pub class: String,
    pub email: String,
}

// ---- hosted documents ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerDocument {
    pub name: String,
    pub url: String,
    pub description: String,
    pub image: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDocument {
    pub name: String,
    pub description: String,
    pub image: String,
    pub criteria: String,
    pub issuer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(rename = "type")]
    pub kind: String,
    pub hashed: bool,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assertion {
    pub uid: String,
    pub recipient: Recipient,
    pub badge: String,
    pub issued_on: i64,
    pub verify: Verification,
}

// ---- CLI reports ----

#[derive(Serialize)]
pub struct ClassSummary {
    pub name: String,
    pub badge_count: usize,
}

#[derive(Serialize)]
pub struct StatusReport {
    pub user: String,
    pub repo: String,
    pub storage: String,
    pub has_issuer: bool,
    pub class_count: usize,
    pub badge_count: usize,
    pub classes: Vec<ClassSummary>,
}

#[derive(Serialize)]
pub struct IssuedClass {
    pub segment: String,
    pub document: ClassDocument,
}
