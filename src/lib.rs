pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use adapters::github::{GitHubClient, GitHubSettings};
pub use config::AppConfig;
pub use crate::core::recent_releases::{run as recent_releases, RecentReleasesRequest};
pub use crate::core::report::Report;
pub use domain::ports::HostingApi;
pub use utils::error::{GhmError, Result};
