//! Crate-wide error type
//!
//! Everything here is fatal. Once the frame loop is running the only
//! fallible operations are presenting a frame and a broken puzzle invariant.

use std::path::PathBuf;
use thiserror::Error;

use crate::tuner::PuzzleError;

#[derive(Error, Debug)]
pub enum GameError {
    /// SDL reports its failures as plain strings
    #[error("display error: {0}")]
    Display(String),

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unknown key name '{0}' in controls config")]
    UnknownKey(String),

    #[error("missing sound asset {path}: {source}")]
    AssetMissing {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot decode sound asset {path}: {source}")]
    AssetDecode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },

    #[error("audio output unavailable: {0}")]
    AudioStream(#[from] rodio::StreamError),

    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
}

impl From<String> for GameError {
    fn from(message: String) -> Self {
        Self::Display(message)
    }
}
