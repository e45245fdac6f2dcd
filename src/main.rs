use clap::Parser;
use ghm::config::cli::{Command, ConfigCommand, RecentReleasesArgs, RefsCommand};
use ghm::utils::logger;
use ghm::{recent_releases, AppConfig, Cli, GhmError, GitHubClient, HostingApi, RecentReleasesRequest};
use std::io::Write;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config_file.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(e.exit_code());
        }
    };

    logger::init_cli_logger(&config.log_level, cli.verbose);
    tracing::debug!(command = ?cli.command, "starting ghm");

    if let Err(e) = dispatch(cli.command, config).await {
        tracing::error!(error = %e, exit_code = e.exit_code(), "command failed");
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn dispatch(command: Command, config: AppConfig) -> Result<(), GhmError> {
    match command {
        Command::Config { action } => {
            let yaml = match action {
                ConfigCommand::Dump => config.to_dump_yaml()?,
                ConfigCommand::Generate => AppConfig::default_yaml()?,
            };
            println!("{}", yaml);
            Ok(())
        }
        Command::Refs {
            action: RefsCommand::RecentReleases(args),
        } => run_recent_releases(args, &config).await,
    }
}

async fn run_recent_releases(args: RecentReleasesArgs, config: &AppConfig) -> Result<(), GhmError> {
    let api: Arc<dyn HostingApi> = Arc::new(GitHubClient::from_config(config)?);

    let mut request = RecentReleasesRequest::for_owner(args.owner)
        .with_max_concurrency(args.max_concurrency.unwrap_or(config.max_concurrency));
    if let Some(repo) = args.repo_name {
        request = request.with_repo(repo);
    }

    let report = recent_releases(api, &request).await?;
    report.write_diagnostics(std::io::stderr().lock())?;

    let mut stdout = std::io::stdout().lock();
    report.write_to(&mut stdout)?;
    stdout.flush()?;

    tracing::info!(
        lines = report.lines().len(),
        skipped = report.skipped().len(),
        "report written"
    );
    Ok(())
}
