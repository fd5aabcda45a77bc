use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while reading a question file. All of them are fatal.
#[derive(Debug, Error)]
pub enum QuestionFileError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A content line without a `name: value` separator.
    #[error("failed to parse {}:{line}: {text:?}", .path.display())]
    MissingSeparator {
        path: PathBuf,
        line: usize,
        text: String,
    },

    #[error("invalid question field {name:?} at {}:{line}:\n  {text}", .path.display())]
    UnknownField {
        path: PathBuf,
        line: usize,
        name: String,
        text: String,
    },

    #[error("invalid value for {name:?} at {}:{line}: {reason}", .path.display())]
    InvalidValue {
        path: PathBuf,
        line: usize,
        name: String,
        reason: String,
    },
}

impl QuestionFileError {
    /// 1-based line number of the offending line, when the error points at one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Io { .. } => None,
            Self::MissingSeparator { line, .. }
            | Self::UnknownField { line, .. }
            | Self::InvalidValue { line, .. } => Some(*line),
        }
    }
}
