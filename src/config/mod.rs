#[cfg(feature = "cli")]
pub mod cli;

use crate::core::recent_releases::DEFAULT_MAX_CONCURRENCY;
use crate::utils::error::{GhmError, Result};
use crate::utils::validation::{validate_one_of, validate_positive_number, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAMES: [&str; 2] = [".ghm.yaml", ".ghm.yml"];
pub const ENV_PREFIX: &str = "GHM_";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const MASK: &str = "********";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub auth_token: String,
    pub log_level: String,
    pub api_base_url: String,
    pub max_concurrency: usize,
    pub request_timeout_secs: u64,
    /// Sleep until the rate-limit window resets instead of failing.
    pub wait_on_rate_limit: bool,
    pub max_rate_limit_wait_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auth_token: String::new(),
            log_level: "info".to_string(),
            api_base_url: "https://api.github.com".to_string(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            request_timeout_secs: 30,
            wait_on_rate_limit: true,
            max_rate_limit_wait_secs: 3600,
        }
    }
}

impl AppConfig {
    /// Defaults, then the config file, then `GHM_*` environment variables.
    ///
    /// `explicit` names a file that must exist; otherwise `.ghm.yaml` is
    /// looked up in the working directory and then `$HOME`.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(GhmError::config(format!(
                        "unable to read configuration file: {} does not exist",
                        path.display()
                    )));
                }
                Some(path.to_path_buf())
            }
            None => discover_config_file(&search_dirs()),
        };

        let mut config = match &path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration file");
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| {
            GhmError::config(format!("unable to unmarshal configuration: {}", e))
        })
    }

    /// Overrides fields from `GHM_<FIELD>` variables resolved by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |field: &str| lookup(&format!("{}{}", ENV_PREFIX, field.to_uppercase()));

        if let Some(token) = var("auth_token") {
            self.auth_token = token;
        }
        if let Some(level) = var("log_level") {
            self.log_level = level;
        }
        if let Some(url) = var("api_base_url") {
            self.api_base_url = url;
        }
        if let Some(value) = var("max_concurrency") {
            self.max_concurrency = parse_env("max_concurrency", &value)?;
        }
        if let Some(value) = var("request_timeout_secs") {
            self.request_timeout_secs = parse_env("request_timeout_secs", &value)?;
        }
        if let Some(value) = var("wait_on_rate_limit") {
            self.wait_on_rate_limit = parse_bool("wait_on_rate_limit", &value)?;
        }
        if let Some(value) = var("max_rate_limit_wait_secs") {
            self.max_rate_limit_wait_secs = parse_env("max_rate_limit_wait_secs", &value)?;
        }
        Ok(())
    }

    pub fn auth_token(&self) -> Option<&str> {
        let token = self.auth_token.trim();
        (!token.is_empty()).then_some(token)
    }

    /// The effective configuration as YAML, with the token masked.
    pub fn to_dump_yaml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.auth_token().is_some() {
            shown.auth_token = MASK.to_string();
        }
        Ok(serde_yaml::to_string(&shown)?)
    }

    pub fn default_yaml() -> Result<String> {
        Ok(serde_yaml::to_string(&Self::default())?)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_base_url", &self.api_base_url)?;
        validate_positive_number("request_timeout_secs", self.request_timeout_secs, 1)?;
        validate_one_of("log_level", &self.log_level, &LOG_LEVELS)?;
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(field: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| GhmError::InvalidConfigValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "not a valid number".to_string(),
        })
}

fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(GhmError::InvalidConfigValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(home) = std::env::var_os("HOME") {
        dirs.push(PathBuf::from(home));
    }
    dirs
}

/// First `.ghm.yaml`/`.ghm.yml` found, searching `dirs` in order.
pub fn discover_config_file(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}
