//! Error type shared by every stage of a run.

use std::path::PathBuf;

/// All errors that can end a run.
///
/// Every variant is fatal for the process. A segment without an exchange
/// label is not an error at all; the extractor skips it silently.
#[derive(thiserror::Error, Debug)]
pub enum IxMapError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("HTTP request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Response body from {url} is not valid UTF-8: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("No records extracted from {url}")]
    NoRecords { url: String },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IxMapError {
    /// Process exit code for this error. Every failure exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            IxMapError::Config(_)
            | IxMapError::Pattern(_)
            | IxMapError::Fetch { .. }
            | IxMapError::Decode { .. }
            | IxMapError::NoRecords { .. }
            | IxMapError::Write { .. } => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, IxMapError>;
