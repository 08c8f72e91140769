//! Error types for the boundaries of the engine.
//!
//! Processing a message never fails; these errors only surface when loading a
//! menu snapshot or options from disk, validating options, or writing to a
//! conversation log sink.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid option {name}: {value}")]
    InvalidOption { name: &'static str, value: String },

    #[error("chat log error: {0}")]
    ChatLog(String),
}

pub type Result<T> = std::result::Result<T, Error>;
