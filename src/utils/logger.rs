use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for a configured log level.
pub fn default_directive(log_level: &str, verbose: bool) -> String {
    if verbose {
        "ghm=debug,warn".to_string()
    } else {
        format!("ghm={},warn", log_level.to_lowercase())
    }
}

/// Logs always go to stderr; stdout is reserved for the report.
pub fn init_cli_logger(log_level: &str, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(log_level, verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}
