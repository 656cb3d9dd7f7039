//! Typed error handling for epointer.
//!
//! Provides structured errors that library consumers can match on,
//! with full context about what went wrong and where.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for epointer operations.
#[derive(Error, Debug)]
pub enum EpointerError {
    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Lexical or syntax error in Go source, or a malformed build constraint
    #[error("Parse error in {path}: {message}")]
    Parse {
        path: PathBuf,
        message: String,
        /// Line number (1-indexed) if available
        line: Option<usize>,
        /// Column number (1-indexed) if available
        column: Option<usize>,
    },

    /// The patterns selected no Go files
    #[error("No Go source files in {path}")]
    NoSourceFiles { path: PathBuf },

    /// Files of one directory declare different packages
    #[error("Found packages {expected} and {found} in {path}")]
    PackageMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// A constant spec repeats a predecessor whose type is unknown
    #[error("{path}:{line}:{column}: cannot determine type of constant {name}: {message}")]
    Resolution {
        path: PathBuf,
        line: usize,
        column: usize,
        name: String,
        message: String,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl EpointerError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a parse error without location.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Create a parse error with line/column info.
    pub fn parse_at(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Create a resolution error for the constant declared at the given location.
    pub fn resolution(
        path: impl Into<PathBuf>,
        line: usize,
        column: usize,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Resolution {
            path: path.into(),
            line,
            column,
            name: name.into(),
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

    /// Check if this error was raised before the generation pipeline ran.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Io { .. }
                | Self::Parse { .. }
                | Self::NoSourceFiles { .. }
                | Self::PackageMismatch { .. }
                | Self::InvalidArgument { .. }
        )
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. }
            | Self::Parse { path, .. }
            | Self::NoSourceFiles { path }
            | Self::PackageMismatch { path, .. }
            | Self::Resolution { path, .. }
            | Self::Config { path, .. } => Some(path),
            Self::InvalidArgument { .. } => None,
        }
    }
}

/// Convenience type alias for epointer results.
pub type EpointerResult<T> = Result<T, EpointerError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> EpointerResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> EpointerResult<T> {
        self.map_err(|e| EpointerError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = EpointerError::io(
            PathBuf::from("/test/day.go"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, EpointerError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/test/day.go")));
        assert!(err.to_string().contains("/test/day.go"));
    }

    #[test]
    fn test_parse_error_with_location() {
        let err = EpointerError::parse_at("/src/day.go", "expected type", 10, 5);
        if let EpointerError::Parse { line, column, .. } = &err {
            assert_eq!(*line, Some(10));
            assert_eq!(*column, Some(5));
        } else {
            panic!("Expected Parse error");
        }
    }

    #[test]
    fn test_resolution_error_message() {
        let err = EpointerError::resolution("a.go", 4, 2, "Tuesday", "no preceding constant");
        assert_eq!(
            err.to_string(),
            "a.go:4:2: cannot determine type of constant Tuesday: no preceding constant"
        );
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_is_input_error() {
        assert!(EpointerError::parse("/test.go", "error").is_input_error());
        assert!(EpointerError::NoSourceFiles { path: PathBuf::from(".") }.is_input_error());
        assert!(!EpointerError::config("epointer.toml", "bad").is_input_error());
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let mapped = result.with_path("/missing/file.go");
        assert!(matches!(mapped, Err(EpointerError::Io { .. })));
    }
}
