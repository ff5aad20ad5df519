//! Error types for loading, saving and converting `.properties` documents.
//!
//! The codec itself only fails in two ways: the underlying stream breaks
//! ([`Error::Io`]) or a `\uXXXX` escape is malformed
//! ([`Error::MalformedEscape`]). The remaining variants belong to the Serde
//! bridge, which has to map flat strings onto Rust types.
//!
//! ## Examples
//!
//! ```rust
//! use commented_properties::{CommentedProperties, Error};
//!
//! let mut props = CommentedProperties::new();
//! let err = props.load_str("key=\\u12Z4").unwrap_err();
//!
//! assert!(matches!(err, Error::MalformedEscape { line: 1, .. }));
//! assert!(err.to_string().contains("line 1"));
//! ```

use std::fmt;
use thiserror::Error;

/// Failure while decoding a single backslash escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EscapeError {
    /// The line ended before four hex digits followed `\u`.
    #[error("truncated \\u escape, expected 4 hex digits but found {0}")]
    Truncated(usize),

    /// A character other than `0-9`, `a-f` or `A-F` appeared inside `\uXXXX`.
    #[error("invalid hex digit {0:?} in \\u escape")]
    InvalidHexDigit(char),

    /// A UTF-16 surrogate escape that does not form a valid pair.
    #[error("unpaired surrogate \\u{0:04X}")]
    UnpairedSurrogate(u16),
}

/// Represents all possible errors raised by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A `\uXXXX` escape that could not be decoded. Fatal to the whole load.
    #[error("Malformed escape sequence at line {line}, column {col}: {source}")]
    MalformedEscape {
        line: usize,
        col: usize,
        #[source]
        source: EscapeError,
    },

    /// Unsupported type for serialization
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// A stored string could not be converted into the requested type.
    #[error("Invalid value for key {key:?}: {msg}")]
    InvalidValue { key: String, msg: String },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a malformed escape error.
    ///
    /// `line` and `col` are 1-based; `col` points at the backslash that
    /// started the escape.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use commented_properties::{Error, EscapeError};
    ///
    /// let err = Error::malformed_escape(3, 7, EscapeError::Truncated(2));
    /// assert!(err.to_string().contains("line 3, column 7"));
    /// ```
    pub fn malformed_escape(line: usize, col: usize, source: EscapeError) -> Self {
        Error::MalformedEscape { line, col, source }
    }

    /// Creates an invalid value error for `key`.
    pub fn invalid_value<T: fmt::Display>(key: &str, msg: T) -> Self {
        Error::InvalidValue {
            key: key.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates an unsupported type error for values with no flat representation.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use commented_properties::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_malformed_escape_keeps_source() {
        let err = Error::malformed_escape(2, 5, EscapeError::InvalidHexDigit('Z'));
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("invalid hex digit 'Z' in \\u escape")
        );
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().starts_with("IO error"));
    }

    #[test]
    fn test_unpaired_surrogate_message() {
        let err = EscapeError::UnpairedSurrogate(0xD83D);
        assert_eq!(err.to_string(), "unpaired surrogate \\uD83D");
    }
}
