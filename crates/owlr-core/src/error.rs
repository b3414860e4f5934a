use std::path::PathBuf;
use thiserror::Error;

/// Core error type for owlr operations.
///
/// Configuration and external-tool failures are raised during cache
/// construction and abort the build. A resolution miss is not an error at
/// all; it surfaces as [`crate::hook::Outcome::Declined`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dependency manifest not readable at {path}: {source}")]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("lock file not readable at {path}: {source}")]
    LockfileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn `{command}`: {source}")]
    ExternalToolSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}")]
    ExternalToolFailed {
        command: String,
        status: std::process::ExitStatus,
    },

    #[error("`{command}` produced output that is not valid UTF-8")]
    ExternalToolOutput { command: String },

    #[error("failed to write cache at {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode cache document: {0}")]
    CacheEncode(#[from] serde_json::Error),
}
