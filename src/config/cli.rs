use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ghm", version)]
#[command(about = "GitHub Management Tool")]
#[command(
    long_about = "A tool for performing administrative and analysis tasks with GitHub organizations and repositories."
)]
pub struct Cli {
    /// Set the file from which configuration will be loaded.
    #[arg(short = 'c', long, global = true, env = "GHM_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Enable verbose/debug logging. All logs are written to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Work with CLI configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
    /// Discover and work directly with Git refs.
    Refs {
        #[command(subcommand)]
        action: RefsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write the configuration, as read from file and environment, to stdout.
    Dump,
    /// Write default configuration to stdout.
    Generate,
}

#[derive(Debug, Subcommand)]
pub enum RefsCommand {
    /// Find refs for the two most recent release generations, as CSV.
    RecentReleases(RecentReleasesArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RecentReleasesArgs {
    /// The user/org containing the repo(s) to target.
    #[arg(short, long)]
    pub owner: String,

    /// Specific repository to target.
    #[arg(short, long)]
    pub repo_name: Option<String>,

    /// Repositories processed at once (0 = unbounded). Overrides configuration.
    #[arg(long)]
    pub max_concurrency: Option<usize>,
}
