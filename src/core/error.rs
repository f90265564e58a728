//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// Identifies which configured list a regular expression came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternScope {
    /// A global ignore pattern, tested against full paths.
    Ignore,
    /// The file pattern of the configured directory at this path.
    File(PathBuf),
}

impl std::fmt::Display for PatternScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternScope::Ignore => write!(f, "ignore pattern"),
            PatternScope::File(dir) => write!(f, "file pattern for directory '{}'", dir.display()),
        }
    }
}

/// The primary error type for the `core` module.
///
/// This enum encapsulates all possible errors that can occur during
/// core operations like directory scanning, cache I/O, and pattern compilation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Represents an I/O error, typically from file system operations.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    /// The root of a source directory could not be walked.
    #[error("Failed to walk directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A configured regular expression failed to compile.
    #[error("Failed to compile {scope} '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        scope: PatternScope,
        #[source]
        source: regex::Error,
    },

    /// The cache file exists but is not a valid snapshot.
    #[error("Invalid cache file: {0}")]
    CacheFormat(#[from] serde_json::Error),

    /// Represents an error that occurred when a Tokio task was joined.
    /// This is often due to a task panicking.
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Every candidate port in the probed range refused to bind.
    #[error("No available port found in range {start}-{end}")]
    NoAvailablePort { start: u16, end: u16 },
}
