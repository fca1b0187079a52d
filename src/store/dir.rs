use super::{checked_path, RemoteStore, StoreError};
use crate::domain::constants::HISTORY_PAGE_SIZE;
use crate::domain::models::{CommitRecord, TreeEntry, WriteReceipt};
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const LOG_DIR: &str = ".badger";
const LOG_FILE: &str = "history.jsonl";

#[derive(Debug, Serialize, Deserialize)]
struct LogLine {
    ts: String,
    path: String,
    message: String,
    commit: String,
}

/// Badge repository kept in a plain directory. Commits are appended to
/// `.badger/history.jsonl`; hidden entries never show up in listings.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn log_path(&self) -> PathBuf {
        self.root.join(LOG_DIR).join(LOG_FILE)
    }

    fn append_log(&self, line: &LogLine) -> Result<(), StoreError> {
        let path = self.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(f, "{}", serde_json::to_string(line)?)?;
        Ok(())
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn sorted_names(dir: &Path) -> Result<Vec<(String, bool)>, StoreError> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if is_hidden(&name) {
            continue;
        }
        out.push((name, entry.file_type()?.is_dir()));
    }
    out.sort();
    Ok(out)
}

fn commit_id(path: &str, message: &str, bytes: &[u8], ts: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    hasher.update([0u8]);
    hasher.update(message.as_bytes());
    hasher.update([0u8]);
    hasher.update(ts.as_bytes());
    hasher.update([0u8]);
    hasher.update(bytes);
    hex::encode(&hasher.finalize()[..20])
}

impl RemoteStore for DirStore {
    fn read_tree(&self, path: &str) -> Result<Vec<TreeEntry>, StoreError> {
        let dir = self.root.join(checked_path(path)?);
        if !dir.is_dir() {
            return Ok(vec![]);
        }
        let mut out = Vec::new();
        for (name, is_dir) in sorted_names(&dir)? {
            if is_dir {
                let children = sorted_names(&dir.join(&name))?
                    .into_iter()
                    .filter(|(_, child_is_dir)| !child_is_dir)
                    .map(|(child, _)| child)
                    .collect();
                out.push(TreeEntry::Directory { name, children });
            } else {
                out.push(TreeEntry::Leaf(name));
            }
        }
        debug!(root = %self.root.display(), path, entries = out.len(), "listed directory store");
        Ok(out)
    }

    fn read_history(&self, depth: u32) -> Result<Vec<CommitRecord>, StoreError> {
        let path = self.log_path();
        if !path.exists() {
            return Ok(vec![]);
        }
        let raw = std::fs::read_to_string(path)?;
        let mut lines = Vec::new();
        for l in raw.lines().filter(|l| !l.trim().is_empty()) {
            let line: LogLine = serde_json::from_str(l)?;
            lines.push(CommitRecord::new(line.message));
        }
        let limit = depth.max(1) as usize * HISTORY_PAGE_SIZE as usize;
        Ok(lines.into_iter().rev().take(limit).collect())
    }

    fn write_file(
        &self,
        path: &str,
        message: &str,
        content: &str,
    ) -> Result<WriteReceipt, StoreError> {
        let rel = checked_path(path)?;
        if rel.is_empty() || rel.split('/').any(is_hidden) {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        let target = self.root.join(rel);
        if target.exists() {
            return Err(StoreError::Conflict(rel.to_string()));
        }
        let bytes = base64::engine::general_purpose::STANDARD.decode(content)?;
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, &bytes)?;

        let ts = chrono::Utc::now().to_rfc3339();
        let commit = commit_id(rel, message, &bytes, &ts);
        let logged = self.append_log(&LogLine {
            ts,
            path: rel.to_string(),
            message: message.to_string(),
            commit: commit.clone(),
        });
        // Every stored file has a log line.
        if let Err(e) = logged {
            let _ = std::fs::remove_file(&target);
            if let Some(parent) = target.parent().filter(|p| *p != self.root) {
                // Fails unless empty.
                let _ = std::fs::remove_dir(parent);
            }
            return Err(e);
        }
        debug!(path = rel, %commit, "committed file to directory store");
        Ok(WriteReceipt {
            path: rel.to_string(),
            commit: Some(commit),
        })
    }
}
