//! Typed error handling for deadres.
//!
//! Only declarations-file failures end a run. Everything that happens while
//! scanning source and markup files is reported through these types too, but
//! callers log it and keep going (see [`DeadresError::is_recoverable`]).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for deadres operations.
#[derive(Error, Debug)]
pub enum DeadresError {
    /// I/O error when reading a file
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The generated declarations file could not be interpreted
    #[error("Malformed declarations file {path} at line {line}: {message}")]
    MalformedDeclarations {
        path: PathBuf,
        /// Line number (1-indexed)
        line: usize,
        message: String,
    },

    /// No declarations file was given and none was found under the project root
    #[error("No R.java declarations file found under {root}")]
    DeclarationsNotFound { root: PathBuf },

    /// Markup document failed to parse
    #[error("Markup error in {path}: {message}")]
    Markup { path: PathBuf, message: String },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl DeadresError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a malformed-declarations error at a 1-indexed line.
    pub fn malformed(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::MalformedDeclarations {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a markup parse error.
    pub fn markup(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Markup {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (the scan can skip the file and continue).
    ///
    /// I/O failures count as recoverable here; the declarations parser is the
    /// one caller that escalates them.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Markup { .. })
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::MalformedDeclarations { path, .. } => Some(path),
            Self::DeclarationsNotFound { root } => Some(root),
            Self::Markup { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            Self::InvalidArgument { .. } => None,
        }
    }
}

/// Convenience type alias for deadres results.
pub type DeadresResult<T> = Result<T, DeadresError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> DeadresResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> DeadresResult<T> {
        self.map_err(|e| DeadresError::io(path, e))
    }
}
