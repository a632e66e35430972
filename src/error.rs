use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("You need to specify http or https, skipping {0}")]
    MissingScheme(String),

    #[error("The URL is malformed: {0}")]
    MalformedTarget(String),

    #[error("Can't resolve {0}, check it and try again")]
    UnresolvableHost(String),

    #[error("No target specified, use -t or -T")]
    NoTarget,

    #[error("The target file {} does not exist", .0.display())]
    TargetFileMissing(PathBuf),

    #[error("There was a problem running {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("There was a problem writing {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Aborting all processes")]
    Aborted,

    #[error("Interrupted")]
    Interrupted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(String),
}

impl ScanError {
    /// Whether the dispatcher may skip the current target and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ScanError::MissingScheme(_))
    }
}
