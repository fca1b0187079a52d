use crate::domain::constants::DEFAULT_HISTORY_DEPTH;
use crate::domain::models::{BadgesConfig, ConfigFile};
use crate::services::documents::pages_path;
use std::path::{Path, PathBuf};

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/badger/config.toml"))
}

/// Loads `config.toml`. A missing default file is an empty config; a missing
/// file named explicitly is an error.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<ConfigFile> {
    let path = match explicit {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("config file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let Ok(p) = default_config_path() else {
                return Ok(ConfigFile::default());
            };
            if !p.exists() {
                return Ok(ConfigFile::default());
            }
            p
        }
    };
    let raw = std::fs::read_to_string(&path)?;
    toml::from_str(&raw).map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Default)]
pub struct Overrides<'a> {
    pub user: Option<&'a str>,
    pub repo: Option<&'a str>,
    pub storage: Option<&'a str>,
}

fn pick(flag: Option<&str>, file: Option<&String>) -> Option<String> {
    flag.map(str::to_string)
        .or_else(|| file.cloned())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn resolve_config(file: &ConfigFile, overrides: &Overrides) -> anyhow::Result<BadgesConfig> {
    let Some(user) = pick(overrides.user, file.user.as_ref()) else {
        anyhow::bail!("missing `user`: set it in config.toml or pass --user");
    };
    let Some(repo) = pick(overrides.repo, file.repo.as_ref()) else {
        anyhow::bail!("missing `repo`: set it in config.toml or pass --repo");
    };
    let storage = pick(overrides.storage, file.storage.as_ref())
        .unwrap_or_else(|| format!("https://{}", pages_path(&user, &repo)));
    Ok(BadgesConfig {
        storage: storage.trim_end_matches('/').to_string(),
        user,
        repo,
        history_depth: file.history_depth.unwrap_or(DEFAULT_HISTORY_DEPTH).max(1),
    })
}

/// Token lookup order: `BADGER_TOKEN`, `GITHUB_TOKEN`, then the config file.
pub fn resolve_token(file: &ConfigFile) -> Option<String> {
    resolve_token_with(file, |k| std::env::var(k).ok())
}

fn resolve_token_with(file: &ConfigFile, env: impl Fn(&str) -> Option<String>) -> Option<String> {
    let present = |t: &String| !t.trim().is_empty();
    ["BADGER_TOKEN", "GITHUB_TOKEN"]
        .into_iter()
        .find_map(|k| env(k).filter(present))
        .or_else(|| file.token.clone().filter(present))
}
