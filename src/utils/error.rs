use thiserror::Error;

#[derive(Error, Debug)]
pub enum GhmError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{context}: {message}")]
    Remote { context: String, message: String },

    #[error("got invalid response from {url}: HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("could not parse major version from tag {tag:?}")]
    TagParse { tag: String },

    #[error("release {url} of {repo} is published but has no publish timestamp")]
    DataIntegrity { repo: String, url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value {value:?} for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl GhmError {
    pub fn remote(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Errors that only spoil the repository being processed. Everything
    /// else means the run as a whole cannot be trusted.
    pub fn is_per_repository(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::Remote { .. }
                | Self::UnexpectedStatus { .. }
                | Self::TagParse { .. }
                | Self::Json(_)
        )
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } | Self::InvalidConfigValue { .. } | Self::Yaml(_) => 2,
            Self::DataIntegrity { .. } => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, GhmError>;
