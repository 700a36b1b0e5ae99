use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    System,
    Stargate,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::System => write!(f, "system"),
            LookupKind::Stargate => write!(f, "stargate"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("SVG file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Lookup unavailable for {kind} {id}: {reason}")]
    LookupUnavailable {
        kind: LookupKind,
        id: u64,
        reason: String,
    },

    #[error("Failed to write {}: {source}", path.display())]
    OutputWriteFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
