//! Pure builders for the hosted documents: no store access, no clock, no
//! randomness unless the caller passes it in.

use crate::domain::constants::{
    AWARD_REPO_TOKEN, CLASS_FILE, IMAGE_FILE, ISSUER_FILE, UID_ALPHABET, UID_LEN,
};
use crate::domain::models::{
    Assertion, BadgesConfig, ClassDocument, ClassInput, IssuerDocument, IssuerInput, Recipient,
    Verification,
};
use base64::Engine;
use rand::Rng;
use serde::Serialize;

pub const AWARD_TEMPLATE: &str = include_str!("../templates/award.html");

/// Prefixes `http://` unless the value already starts with `http://` or
/// `https://`.
pub fn normalize_url(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    }
}

/// Directory name for a class: trimmed, inner whitespace runs collapsed to a
/// single `_`.
pub fn class_segment(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// True when `name` can stand alone as one visible directory name in the
/// repository.
pub fn is_path_segment(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
}

/// Joins `parts` under the public storage base.
pub fn storage_url(storage: &str, parts: &[&str]) -> String {
    let mut out = storage.trim_end_matches('/').to_string();
    for p in parts {
        out.push('/');
        out.push_str(p);
    }
    out
}

pub fn pages_path(user: &str, repo: &str) -> String {
    format!("{}.github.io/{}", user, repo)
}

/// Returns a new award page with the repository path filled in. `template` is
/// left untouched, so rendering twice gives the same page.
pub fn render_award(template: &str, repo_path: &str) -> String {
    template.replace(AWARD_REPO_TOKEN, repo_path)
}

pub fn issuer_document(config: &BadgesConfig, input: &IssuerInput) -> IssuerDocument {
    IssuerDocument {
        name: input.name.clone(),
        url: normalize_url(&input.url),
        description: input.description.clone(),
        image: storage_url(&config.storage, &[IMAGE_FILE]),
        email: input.email.clone(),
    }
}

pub fn class_document(config: &BadgesConfig, segment: &str, input: &ClassInput) -> ClassDocument {
    ClassDocument {
        name: input.name.clone(),
        description: input.description.clone(),
        image: storage_url(&config.storage, &[segment, IMAGE_FILE]),
        criteria: normalize_url(&input.criteria),
        issuer: storage_url(&config.storage, &[ISSUER_FILE]),
    }
}

pub fn assertion(
    config: &BadgesConfig,
    class: &str,
    email: &str,
    uid: &str,
    issued_on: i64,
) -> Assertion {
    Assertion {
        uid: uid.to_string(),
        recipient: Recipient {
            kind: "email".to_string(),
            hashed: false,
            identity: email.to_string(),
        },
        badge: storage_url(&config.storage, &[class, CLASS_FILE]),
        issued_on,
        verify: Verification {
            kind: "hosted".to_string(),
            url: storage_url(&config.storage, &[class, badge_file(uid).as_str()]),
        },
    }
}

pub fn badge_file(uid: &str) -> String {
    format!("{}.json", uid)
}

pub fn generate_uid<R: Rng>(rng: &mut R) -> String {
    (0..UID_LEN)
        .map(|_| UID_ALPHABET[rng.gen_range(0..UID_ALPHABET.len())] as char)
        .collect()
}

/// Pretty JSON (two-space indent), base64-encoded for the store.
pub fn encode_json<T: Serialize>(doc: &T) -> Result<String, serde_json::Error> {
    Ok(encode_bytes(serde_json::to_string_pretty(doc)?.as_bytes()))
}

pub fn encode_bytes(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

// ---- commit messages ----

pub fn award_commit(issuer: &str) -> String {
    format!("Add awarding html for an issuer '{}'", issuer)
}

pub fn issuer_commit(issuer: &str) -> String {
    format!("Add metadata for an issuer '{}'", issuer)
}

pub fn issuer_image_commit(issuer: &str) -> String {
    format!("Add image for an issuer '{}'", issuer)
}

pub fn class_commit(segment: &str) -> String {
    format!("Add metadata for class '{}'", segment)
}

pub fn class_image_commit(segment: &str) -> String {
    format!("Add image for class '{}'", segment)
}

pub fn badge_commit(uid: &str, class: &str) -> String {
    format!("Add badge '{}' in class '{}'", uid, class)
}
