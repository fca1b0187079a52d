//! Issuance workflow: initialization against a store, then the three append-only
//! create operations.
//!
//! Each create call performs its writes one after another in a fixed order.
//! A failed write stops the call; files committed before it stay in the store.

use crate::domain::constants::{AWARD_FILE, CLASS_FILE, IMAGE_FILE, ISSUER_FILE};
use crate::domain::models::{
    Assertion, BadgeInput, BadgesConfig, Catalog, ClassDocument, ClassInput, IssuerDocument,
    IssuerInput, WriteReceipt,
};
use crate::services::catalog::{reconcile, CatalogError};
use crate::services::documents::{
    assertion, award_commit, badge_commit, badge_file, class_commit, class_document,
    class_image_commit, class_segment, encode_bytes, encode_json, generate_uid, issuer_commit,
    issuer_document, issuer_image_commit, is_path_segment, pages_path, render_award, AWARD_TEMPLATE,
};
use crate::store::{RemoteStore, StoreError};
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Draws made before accepting a uid that the snapshot already lists.
const UID_ATTEMPTS: usize = 8;

#[derive(thiserror::Error, Debug)]
pub enum BadgeError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("cannot read image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("invalid class name '{0}': must be a single non-empty path segment")]
    InvalidClass(String),
}

fn checked_segment(segment: &str) -> Result<(), BadgeError> {
    if is_path_segment(segment) {
        Ok(())
    } else {
        Err(BadgeError::InvalidClass(segment.to_string()))
    }
}

fn read_image(path: &Path) -> Result<Vec<u8>, BadgeError> {
    std::fs::read(path).map_err(|source| BadgeError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the tree listing and the history concurrently, reconciles them, and
/// returns a workflow handle holding the snapshot.
pub fn initialize<S: RemoteStore>(config: BadgesConfig, store: S) -> Result<Badges<S>, BadgeError> {
    let (tree, history) = std::thread::scope(|s| {
        let tree = s.spawn(|| store.read_tree(""));
        let history = store.read_history(config.history_depth);
        let tree = tree
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (tree, history)
    });
    let tree = tree?;
    let history = history?;
    debug!(
        entries = tree.len(),
        commits = history.len(),
        "read repository state"
    );

    let catalog = reconcile(&tree, &history)?;
    info!(
        user = %config.user,
        repo = %config.repo,
        has_issuer = catalog.has_issuer,
        classes = catalog.classes.len(),
        badges = catalog.badge_count(),
        "catalog reconciled"
    );
    Ok(Badges::new(config, catalog, store))
}

/// Workflow handle. Owns its configuration and store; the catalog is the
/// snapshot taken at initialization and does not follow later writes.
pub struct Badges<S> {
    config: BadgesConfig,
    catalog: Catalog,
    store: S,
}

impl<S: RemoteStore> Badges<S> {
    pub fn new(config: BadgesConfig, catalog: Catalog, store: S) -> Self {
        Self {
            config,
            catalog,
            store,
        }
    }

    pub fn config(&self) -> &BadgesConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn push(&self, path: &str, message: &str, content: &str) -> Result<WriteReceipt, BadgeError> {
        let receipt = self.store.write_file(path, message, content)?;
        info!(
            path = %receipt.path,
            commit = receipt.commit.as_deref().unwrap_or("-"),
            message,
            "wrote file"
        );
        Ok(receipt)
    }

    /// Writes `award.html`, `issuer.json`, then `img.png`.
    pub fn create_issuer(&self, input: &IssuerInput) -> Result<IssuerDocument, BadgeError> {
        let image = read_image(&input.image)?;
        let doc = issuer_document(&self.config, input);
        let award = render_award(
            AWARD_TEMPLATE,
            &pages_path(&self.config.user, &self.config.repo),
        );
        let metadata = encode_json(&doc)?;

        if self.catalog.has_issuer {
            warn!(issuer = %input.name, "repository already has an issuer; writes will conflict");
        }

        self.push(
            AWARD_FILE,
            &award_commit(&input.name),
            &encode_bytes(award.as_bytes()),
        )?;
        self.push(ISSUER_FILE, &issuer_commit(&input.name), &metadata)?;
        self.push(
            IMAGE_FILE,
            &issuer_image_commit(&input.name),
            &encode_bytes(&image),
        )?;
        Ok(doc)
    }

    /// Writes `<segment>/class.json` then `<segment>/img.png`.
    pub fn create_class(&self, input: &ClassInput) -> Result<ClassDocument, BadgeError> {
        let segment = class_segment(&input.name);
        checked_segment(&segment)?;
        let image = read_image(&input.image)?;
        let doc = class_document(&self.config, &segment, input);
        let metadata = encode_json(&doc)?;

        self.push(
            &format!("{}/{}", segment, CLASS_FILE),
            &class_commit(&segment),
            &metadata,
        )?;
        self.push(
            &format!("{}/{}", segment, IMAGE_FILE),
            &class_image_commit(&segment),
            &encode_bytes(&image),
        )?;
        Ok(doc)
    }

    /// Writes one assertion at `<class>/<uid>.json`.
    pub fn create_badge(&self, input: &BadgeInput) -> Result<Assertion, BadgeError> {
        self.create_badge_with(input, &mut rand::thread_rng())
    }

    /// [`Badges::create_badge`] drawing the uid from `rng`.
    pub fn create_badge_with<R: Rng>(
        &self,
        input: &BadgeInput,
        rng: &mut R,
    ) -> Result<Assertion, BadgeError> {
        checked_segment(&input.class)?;
        let uid = self.fresh_uid(&input.class, rng);
        let issued_on = chrono::Utc::now().timestamp();
        let doc = assertion(&self.config, &input.class, &input.email, &uid, issued_on);
        let content = encode_json(&doc)?;

        self.push(
            &format!("{}/{}", input.class, badge_file(&uid)),
            &badge_commit(&uid, &input.class),
            &content,
        )?;
        Ok(doc)
    }

    /// Draws a uid, redrawing while it matches one the snapshot lists for
    /// `class`. Uids issued after initialization are not checked.
    fn fresh_uid<R: Rng>(&self, class: &str, rng: &mut R) -> String {
        let known = self.catalog.class(class).map(|c| c.badges.as_slice());
        let mut uid = generate_uid(rng);
        for _ in 1..UID_ATTEMPTS {
            if !known.is_some_and(|badges| badges.contains(&uid)) {
                break;
            }
            uid = generate_uid(rng);
        }
        uid
    }
}
