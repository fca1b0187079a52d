use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "badger",
    version,
    about = "Issue Open Badges into a git-hosted repository"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,
    #[arg(
        long,
        global = true,
        env = "BADGER_CONFIG",
        help = "Config file (default ~/.config/badger/config.toml)"
    )]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Repository owner")]
    pub user: Option<String>,
    #[arg(long, global = true, help = "Repository name")]
    pub repo: Option<String>,
    #[arg(
        long,
        global = true,
        help = "Public base URL of the hosted files (default https://<user>.github.io/<repo>)"
    )]
    pub storage: Option<String>,
    #[arg(
        long,
        global = true,
        help = "Use a local directory as the badge repository instead of GitHub"
    )]
    pub store_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show issuer presence, classes and badge counts
    Status,
    /// List classes in creation order
    Classes,
    /// List badge uids of one class
    Badges { class: String },
    Issuer {
        #[command(subcommand)]
        command: IssuerCommands,
    },
    Class {
        #[command(subcommand)]
        command: ClassCommands,
    },
    Badge {
        #[command(subcommand)]
        command: BadgeCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum IssuerCommands {
    /// Write award.html, issuer.json and img.png
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        email: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ClassCommands {
    /// Write <class>/class.json and <class>/img.png
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        criteria: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum BadgeCommands {
    /// Award a badge of <class> to a recipient email
    Create {
        #[arg(long)]
        class: String,
        #[arg(long)]
        email: String,
    },
}
