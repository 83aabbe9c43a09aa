use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum YaapError {
    /// A declaration was rejected before any parsing happened.
    #[error("Invalid argument configuration: {0}")]
    Configuration(String),
    #[error(transparent)]
    Parse(#[from] clap::Error),
    #[error("Failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse YAML config file {}: {reason}", path.display())]
    ConfigFormat { path: PathBuf, reason: String },
    #[error("Unknown key '{key}' in config file {}", path.display())]
    UnknownConfigKey { path: PathBuf, key: String },
    #[error("Failed to read argument file {}: {source}", path.display())]
    ArgumentFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to determine working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),
}

impl YaapError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Print the error and exit the way clap does for its own errors.
    pub fn exit(&self) -> ! {
        match self {
            Self::Parse(err) => err.exit(),
            other => {
                eprintln!("error: {}", other);
                std::process::exit(2);
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, YaapError>;
