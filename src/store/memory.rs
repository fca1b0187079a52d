use super::{checked_path, RemoteStore, StoreError};
use crate::domain::constants::HISTORY_PAGE_SIZE;
use crate::domain::models::{CommitRecord, TreeEntry, WriteReceipt};
use base64::Engine;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct MemoryState {
    files: BTreeMap<String, Vec<u8>>,
    /// Oldest first.
    commits: Vec<CommitRecord>,
    fail_writes_to: Option<String>,
}

/// In-process store. Seed it with files and commits, run the workflow against
/// it, then inspect what was written.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a file without recording a commit.
    pub fn with_file(self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.state().files.insert(path.to_string(), bytes.into());
        self
    }

    /// Records a commit as the newest history entry.
    pub fn with_commit(self, message: &str) -> Self {
        self.state().commits.push(CommitRecord::new(message));
        self
    }

    /// Makes every write to `path` fail with a 500 status.
    pub fn fail_writes_to(self, path: &str) -> Self {
        self.state().fail_writes_to = Some(path.to_string());
        self
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.state().files.get(path).cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        self.state().files.keys().cloned().collect()
    }

    /// Commit messages, oldest first.
    pub fn history_messages(&self) -> Vec<String> {
        self.state()
            .commits
            .iter()
            .map(|c| c.message.clone())
            .collect()
    }
}

impl RemoteStore for MemoryStore {
    fn read_tree(&self, path: &str) -> Result<Vec<TreeEntry>, StoreError> {
        let prefix = match checked_path(path)? {
            "" => String::new(),
            p => format!("{}/", p),
        };
        let state = self.state();
        let mut out: Vec<TreeEntry> = Vec::new();
        for key in state.files.keys() {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                None => out.push(TreeEntry::Leaf(rest.to_string())),
                Some((dir, child)) => {
                    let idx = match out.iter().position(
                        |e| matches!(e, TreeEntry::Directory { name, .. } if name == dir),
                    ) {
                        Some(idx) => idx,
                        None => {
                            out.push(TreeEntry::dir(dir, Vec::<String>::new()));
                            out.len() - 1
                        }
                    };
                    if let TreeEntry::Directory { children, .. } = &mut out[idx] {
                        if !child.contains('/') {
                            children.push(child.to_string());
                        }
                    }
                }
            }
        }
        Ok(out)
    }

    fn read_history(&self, depth: u32) -> Result<Vec<CommitRecord>, StoreError> {
        let limit = depth.max(1) as usize * HISTORY_PAGE_SIZE as usize;
        Ok(self
            .state()
            .commits
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    fn write_file(
        &self,
        path: &str,
        message: &str,
        content: &str,
    ) -> Result<WriteReceipt, StoreError> {
        let path = checked_path(path)?;
        let mut state = self.state();
        if state.fail_writes_to.as_deref() == Some(path) {
            return Err(StoreError::Status {
                status: 500,
                body: format!("injected failure for {}", path),
            });
        }
        if state.files.contains_key(path) {
            return Err(StoreError::Conflict(path.to_string()));
        }
        let bytes = base64::engine::general_purpose::STANDARD.decode(content)?;
        state.files.insert(path.to_string(), bytes);
        state.commits.push(CommitRecord::new(message));
        Ok(WriteReceipt {
            path: path.to_string(),
            commit: Some(format!("mem-{}", state.commits.len())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::domain::models::TreeEntry;
    use crate::store::RemoteStore;

    #[test]
    fn tree_groups_nested_files_by_directory() {
        let store = MemoryStore::new()
            .with_file("award.html", "x")
            .with_file("Foo_Bar/class.json", "{}")
            .with_file("Foo_Bar/img.png", "png")
            .with_file("issuer.json", "{}");
        let tree = store.read_tree("").unwrap();
        assert_eq!(
            tree,
            vec![
                TreeEntry::dir("Foo_Bar", ["class.json", "img.png"]),
                TreeEntry::leaf("award.html"),
                TreeEntry::leaf("issuer.json"),
            ]
        );
        assert_eq!(
            store.read_tree("Foo_Bar").unwrap(),
            vec![TreeEntry::leaf("class.json"), TreeEntry::leaf("img.png")]
        );
    }

    #[test]
    fn history_is_newest_first() {
        let store = MemoryStore::new().with_commit("one").with_commit("two");
        let history = store.read_history(1).unwrap();
        assert_eq!(history[0].message, "two");
        assert_eq!(store.history_messages(), vec!["one", "two"]);
    }
}
