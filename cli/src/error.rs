use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("read stdin: {0}")]
    Stdin(#[source] std::io::Error),
    #[error("parse {what}: {message}")]
    Parse { what: String, message: String },
    #[error("{0}")]
    InvalidInput(String),
    #[error("remote: {0}")]
    Remote(String),
    #[error("remote returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("serialize output: {0}")]
    Output(String),
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        CliError::Remote(e.to_string())
    }
}
