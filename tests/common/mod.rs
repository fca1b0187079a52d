#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfixture";

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub store: PathBuf,
    pub image: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");
        let store = tmp.path().join("store");
        fs::create_dir_all(&store).expect("create store dir");
        let image = tmp.path().join("badge.png");
        fs::write(&image, PNG).expect("write fixture image");

        Self {
            _tmp: tmp,
            home,
            store,
            image,
        }
    }

    /// `badger` against the directory store as `acme/badges`.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("badger");
        cmd.env("HOME", &self.home)
            .env_remove("BADGER_CONFIG")
            .env_remove("BADGER_TOKEN")
            .env_remove("GITHUB_TOKEN")
            .env_remove("RUST_LOG")
            .arg("--store-dir")
            .arg(&self.store)
            .args(["--user", "acme", "--repo", "badges"]);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn image_arg(&self) -> &str {
        self.image.to_str().expect("image path utf8")
    }

    pub fn create_issuer(&self) -> Value {
        self.run_json(&[
            "issuer",
            "create",
            "--name",
            "Acme",
            "--url",
            "acme.org",
            "--description",
            "We make things",
            "--image",
            self.image_arg(),
            "--email",
            "badges@acme.org",
        ])
    }

    pub fn create_class(&self, name: &str) -> Value {
        self.run_json(&[
            "class",
            "create",
            "--name",
            name,
            "--description",
            "Did the thing",
            "--image",
            self.image_arg(),
            "--criteria",
            "acme.org/criteria",
        ])
    }

    pub fn read_store(&self, rel: &str) -> Vec<u8> {
        fs::read(self.store.join(rel)).expect("read store file")
    }

    pub fn store_has(&self, rel: &str) -> bool {
        self.store.join(rel).exists()
    }

    pub fn history(&self) -> Vec<Value> {
        read_jsonl(&self.store.join(".badger/history.jsonl"))
    }

    pub fn audit(&self) -> Vec<Value> {
        read_jsonl(&self.home.join(".config/badger/audit.jsonl"))
    }
}

fn read_jsonl(path: &Path) -> Vec<Value> {
    let Ok(raw) = fs::read_to_string(path) else {
        return vec![];
    };
    raw.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("valid jsonl line"))
        .collect()
}
