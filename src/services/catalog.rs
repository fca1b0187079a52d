//! Rebuilds the catalog snapshot from a root tree listing and the change
//! history. Pure: the same inputs always give the same catalog.

use crate::domain::constants::{
    AWARD_FILE, CLASS_COMMIT_MARKER, CLASS_FILE, IMAGE_FILE, ISSUER_FILE,
};
use crate::domain::models::{Catalog, ClassEntry, CommitRecord, TreeEntry};
use tracing::warn;

/// The repository layout contradicts itself. Initialization stops and no
/// catalog is produced.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("invalid declaration of the issuer: class '{class}' exists but issuer files are missing")]
    IssuerMissing { class: String },
    #[error("invalid declaration of class '{class}': missing {missing}")]
    IncompleteClass { class: String, missing: String },
}

pub fn has_issuer(tree: &[TreeEntry]) -> bool {
    let leaf = |wanted: &str| {
        tree.iter()
            .any(|e| matches!(e, TreeEntry::Leaf(name) if name == wanted))
    };
    leaf(ISSUER_FILE) && leaf(IMAGE_FILE) && leaf(AWARD_FILE)
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Collects class directories in listing order. Everything in a class
/// directory besides its metadata and image is a badge.
pub fn discover_classes(
    tree: &[TreeEntry],
    has_issuer: bool,
) -> Result<Vec<ClassEntry>, CatalogError> {
    let mut classes = Vec::new();
    for entry in tree {
        let TreeEntry::Directory { name, children } = entry else {
            continue;
        };
        if !has_issuer {
            return Err(CatalogError::IssuerMissing {
                class: name.clone(),
            });
        }
        for required in [CLASS_FILE, IMAGE_FILE] {
            if !children.iter().any(|c| c == required) {
                return Err(CatalogError::IncompleteClass {
                    class: name.clone(),
                    missing: required.to_string(),
                });
            }
        }
        let badges = children
            .iter()
            .filter(|c| c.as_str() != CLASS_FILE && c.as_str() != IMAGE_FILE)
            .map(|c| strip_extension(c).to_string())
            .collect();
        classes.push(ClassEntry {
            name: name.clone(),
            badges,
        });
    }
    Ok(classes)
}

/// Class name recorded by a class-creation commit: the text between the first
/// and the last single quote.
pub fn class_name_from_commit(message: &str) -> Option<&str> {
    if !message.contains(CLASS_COMMIT_MARKER) {
        return None;
    }
    let start = message.find('\'')?;
    let end = message.rfind('\'')?;
    if end <= start {
        return None;
    }
    Some(&message[start + 1..end])
}

/// Orders classes by the first commit in `history` that created them, in the
/// order `history` is given. Classes no commit mentions keep their listing
/// order and go last.
pub fn order_classes(classes: Vec<ClassEntry>, history: &[CommitRecord]) -> Vec<ClassEntry> {
    let mut pending: Vec<Option<ClassEntry>> = classes.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(pending.len());

    for record in history {
        let Some(name) = class_name_from_commit(&record.message) else {
            continue;
        };
        let slot = pending
            .iter_mut()
            .find(|slot| matches!(slot, Some(c) if c.name == name));
        if let Some(class) = slot.and_then(Option::take) {
            ordered.push(class);
        }
    }

    for class in pending.into_iter().flatten() {
        warn!(
            class = %class.name,
            "no creation commit found in history; listing class last"
        );
        ordered.push(class);
    }
    ordered
}

pub fn reconcile(tree: &[TreeEntry], history: &[CommitRecord]) -> Result<Catalog, CatalogError> {
    let has_issuer = has_issuer(tree);
    let classes = discover_classes(tree, has_issuer)?;
    Ok(Catalog {
        has_issuer,
        classes: order_classes(classes, history),
    })
}
