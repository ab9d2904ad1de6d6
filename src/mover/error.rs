//! Error types for line and token operations

use std::fmt;
use std::path::PathBuf;

/// Coarse classification of a [MoverError], convenient for matching in callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    PreconditionFailed,
    InvalidOperand,
    InvalidPattern,
    Io,
    Config,
}

/// Errors raised by the line/token model
#[derive(Debug)]
pub enum MoverError {
    /// A required single element could not be located (token seek, target line, empty list)
    NotFound(String),
    /// The receiver is in a state the operation does not accept (wrong element count,
    /// a line its owner does not hold)
    PreconditionFailed(String),
    /// The operation was handed something it cannot process (detached line id, empty delimiter)
    InvalidOperand(String),
    /// A pattern failed to compile
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    /// Reading or writing a file failed
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Configuration could not be loaded or deserialized
    Config(config::ConfigError),
}

impl MoverError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MoverError::NotFound(_) => ErrorKind::NotFound,
            MoverError::PreconditionFailed(_) => ErrorKind::PreconditionFailed,
            MoverError::InvalidOperand(_) => ErrorKind::InvalidOperand,
            MoverError::InvalidPattern { .. } => ErrorKind::InvalidPattern,
            MoverError::Io { .. } => ErrorKind::Io,
            MoverError::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn requires_single_element(method: &str, count: usize) -> Self {
        MoverError::PreconditionFailed(format!(
            "Method \"{}\" requires a single element, this collection of lines contains \"{}\"",
            method, count
        ))
    }
}

impl fmt::Display for MoverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoverError::NotFound(msg) => write!(f, "Not found: {}", msg),
            MoverError::PreconditionFailed(msg) => write!(f, "Precondition failed: {}", msg),
            MoverError::InvalidOperand(msg) => write!(f, "Invalid operand: {}", msg),
            MoverError::InvalidPattern { pattern, source } => {
                write!(f, "Invalid regex pattern {:?}: {}", pattern, source)
            }
            MoverError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            MoverError::Config(err) => write!(f, "Configuration error: {}", err),
        }
    }
}

impl std::error::Error for MoverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MoverError::InvalidPattern { source, .. } => Some(source),
            MoverError::Io { source, .. } => Some(source),
            MoverError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for MoverError {
    fn from(err: config::ConfigError) -> Self {
        MoverError::Config(err)
    }
}

/// Result alias used throughout the crate
pub type MoverResult<T> = Result<T, MoverError>;
