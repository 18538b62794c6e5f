use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of an [`Error`], one per failing step of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Argument,
    File,
    Environment,
    Network,
    Api,
    Read,
    Parse,
    EmptyResponse,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Argument(String),

    #[error("failed to read {what} {}: {source}", path.display())]
    File {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to locate executable directory: {0}")]
    Executable(#[source] std::io::Error),

    #[error("{0} is not set")]
    Environment(&'static str),

    #[error("failed to send request: {0}")]
    Network(#[source] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to read response: {0}")]
    Read(#[source] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no choices in response")]
    EmptyResponse,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Argument(_) => ErrorKind::Argument,
            Error::File { .. } | Error::Executable(_) => ErrorKind::File,
            Error::Environment(_) => ErrorKind::Environment,
            Error::Network(_) => ErrorKind::Network,
            Error::Api { .. } => ErrorKind::Api,
            Error::Read(_) => ErrorKind::Read,
            Error::Parse(_) => ErrorKind::Parse,
            Error::EmptyResponse => ErrorKind::EmptyResponse,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
