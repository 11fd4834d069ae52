//! Error types
//!
//! Script errors abort a whole load; edit errors reject a single mutation.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading, parsing or writing a `.rdr` script
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("can't use script file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("script extension must be '.rdr', not '{found}'")]
    Extension { found: String },
    #[error("{file}, line {line}: unrecognized entity '{tag}'")]
    UnrecognizedEntity { file: String, line: usize, tag: String },
    #[error("{file}, line {line}: expected {expected} decimal numbers, not {found}")]
    FieldCount {
        file: String,
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("{file}, line {line}: could not convert '{value}' to a decimal number")]
    InvalidNumber {
        file: String,
        line: usize,
        value: String,
    },
}

impl ScriptError {
    /// Short kind name, used as the prefix of fatal CLI messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                "FileNotFoundError"
            }
            Self::Io { .. } => "IOError",
            _ => "ScriptParserError",
        }
    }
}

/// Result of script operations
pub type Result<T, E = ScriptError> = std::result::Result<T, E>;

/// Rejected entity mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),
}
