//! Error types for asset fetching and parsing

use thiserror::Error;

/// A malformed OBJ document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObjError {
    /// Statement that could not be parsed, with its 1-based line number
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Errors that end a single fetch attempt
#[derive(Error, Debug)]
pub enum AssetError {
    /// Transport-level HTTP failure
    #[error("request to {location} failed: {message}")]
    Http { location: String, message: String },

    /// Server answered with a non-success status
    #[error("request to {location} returned HTTP {status}")]
    HttpStatus { location: String, status: u16 },

    /// Local file could not be read
    #[error("failed to read {location}: {error}")]
    Io {
        location: String,
        #[source]
        error: std::io::Error,
    },

    /// Body is not UTF-8 text
    #[error("{location} is not valid UTF-8: {error}")]
    Utf8 {
        location: String,
        #[source]
        error: std::string::FromUtf8Error,
    },

    /// Body is not a valid OBJ document
    #[error("{location} is not a valid OBJ file: {error}")]
    Obj {
        location: String,
        #[source]
        error: ObjError,
    },

    /// The fetch task itself went away before reporting
    #[error("fetch task for {location} ended without a result")]
    TaskLost { location: String },
}

/// Result type alias for asset operations
pub type AssetResult<T> = Result<T, AssetError>;
