use clap::Parser;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;

pub use badger::domain::constants::{DEFAULT_GITHUB_API, DEFAULT_TIMEOUT_MS};
pub use badger::domain::models::{
    BadgeInput, BadgesConfig, ClassInput, ClassSummary, ConfigFile, IssuedClass, IssuerInput,
    StatusReport,
};
pub use badger::services::config::{load_config, resolve_config, resolve_token, Overrides};
pub use badger::services::documents::class_segment;
pub use badger::services::output::{print_document, print_one, print_out};
pub use badger::services::storage::audit;
pub use badger::{initialize, Badges, DirStore, GitHubStore, GitHubStoreConfig, RemoteStore};
pub use cli::{BadgeCommands, ClassCommands, Cli, Commands, IssuerCommands};
use commands::{handle_catalog_commands, handle_issue_commands};

pub type Workflow = Badges<Box<dyn RemoteStore>>;

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(fmt::layer().without_time().with_writer(std::io::stderr))
        .try_init();
}

fn open_store(
    cli: &Cli,
    file: &ConfigFile,
    config: &BadgesConfig,
) -> anyhow::Result<Box<dyn RemoteStore>> {
    if let Some(dir) = &cli.store_dir {
        tracing::debug!(root = %dir.display(), "using directory store");
        return Ok(Box::new(DirStore::new(dir)));
    }
    let gh = GitHubStoreConfig::new(&config.user, &config.repo)
        .with_api_base(file.api.as_deref().unwrap_or(DEFAULT_GITHUB_API))
        .with_token(resolve_token(file))
        .with_timeout(Duration::from_millis(
            file.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
        ));
    Ok(Box::new(GitHubStore::new(gh)?))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file = load_config(cli.config.as_deref())?;
    let config = resolve_config(
        &file,
        &Overrides {
            user: cli.user.as_deref(),
            repo: cli.repo.as_deref(),
            storage: cli.storage.as_deref(),
        },
    )?;
    let store = open_store(&cli, &file, &config)?;
    let badges: Workflow = initialize(config, store)?;

    if handle_catalog_commands(&cli, &badges)? {
        return Ok(());
    }
    if handle_issue_commands(&cli, &badges)? {
        return Ok(());
    }
    anyhow::bail!("unhandled command")
}
