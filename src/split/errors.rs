/// Errors from the splitting core.
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while planning or performing a split.
#[derive(Debug, Error)]
pub enum SplitError {
    /// The input path does not name an existing regular file.
    #[error("File '{}' does not exist", path.display())]
    NotFound {
        /// The path that was checked.
        path: PathBuf,
    },

    /// The input file has zero bytes.
    #[error("File '{}' is empty", path.display())]
    EmptyInput {
        /// The empty input file.
        path: PathBuf,
    },

    /// Both, neither, or a non-positive split parameter was supplied.
    #[error("Invalid split mode: {reason}")]
    InvalidMode {
        /// What was wrong with the supplied parameters.
        reason: String,
    },

    /// More parts were requested than the input has lines.
    #[error(
        "File has only {total_lines} lines, which is less than the number of parts ({parts})"
    )]
    TooManyParts {
        /// Requested number of parts.
        parts: usize,
        /// Total lines counted in the input.
        total_lines: usize,
    },

    /// A line of the input is not valid UTF-8.
    #[error("File '{}' is not valid UTF-8 (line {line})", path.display())]
    InvalidEncoding {
        /// The input file.
        path: PathBuf,
        /// One-based number of the first offending line.
        line: usize,
    },

    /// Reading the input or writing a part failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// The file being read or written when the error occurred.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },

    /// The answer to a prompt could not be read.
    #[error("Failed to read answer: {0}")]
    Prompt(#[source] std::io::Error),

    /// The user declined to overwrite existing part files.
    #[error("Aborting to avoid overwriting '{}'", existing.display())]
    Aborted {
        /// The first colliding part file.
        existing: PathBuf,
    },
}

impl SplitError {
    /// Shorthand for wrapping an I/O error with the path it concerns.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Shorthand for an `InvalidMode` error.
    #[must_use]
    pub fn invalid_mode(reason: impl Into<String>) -> Self {
        Self::InvalidMode {
            reason: reason.into(),
        }
    }

    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => 4,
            Self::EmptyInput { .. } | Self::InvalidMode { .. } | Self::TooManyParts { .. } => 2,
            Self::Aborted { .. } => 3,
            Self::InvalidEncoding { .. } | Self::Io { .. } | Self::Prompt(_) => 1,
        }
    }
}
