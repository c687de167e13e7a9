use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CardError>;

// The main crate error type
#[derive(Debug, Error)]
pub enum CardError {
    #[error("Failed to open {path:?}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {what} Json")]
    Json {
        what: &'static str,
        source: serde_json::Error,
    },
    #[error("Card configuration must be a Json object")]
    NotAnObject,
    #[error("Unknown view: \"{0}\"")]
    UnknownView(String),
    #[error("Unknown button: \"{0}\"")]
    UnknownButton(String),
}
