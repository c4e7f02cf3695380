use std::path::PathBuf;

use thiserror::Error;

/// A theme token or layout length that could not be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("unknown color family in theme token `{0}`")]
    UnknownFamily(String),

    #[error("unsupported shade in theme token `{0}` (expected 100, 300, 500 or 700)")]
    UnknownShade(String),

    #[error("malformed hex color `{0}`")]
    MalformedHex(String),

    #[error("malformed length `{0}` (expected e.g. `0%` or `24px`)")]
    MalformedLength(String),
}

/// A deck of steps that violates the record invariants.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("deck contains no steps")]
    Empty,

    #[error("step {ordinal}: both left and right anchors are set")]
    BothAnchors { ordinal: usize },

    #[error("step {ordinal}: neither a left nor a right anchor is set")]
    NoAnchor { ordinal: usize },

    #[error("step {ordinal}: {source}")]
    Token {
        ordinal: usize,
        #[source]
        source: TokenError,
    },
}

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// Video recording errors.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("failed to start ffmpeg: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("ffmpeg stdin is not available")]
    NoStdin,

    #[error("failed to write frame to ffmpeg: {0}")]
    Write(#[source] std::io::Error),

    #[error("frame is {actual} bytes, expected {expected}")]
    FrameSize { expected: usize, actual: usize },

    #[error("ffmpeg exited with {0}")]
    Exit(std::process::ExitStatus),
}
