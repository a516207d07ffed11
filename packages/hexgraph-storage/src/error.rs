//! Error types for hexgraph-storage

use std::fmt;
use thiserror::Error;

/// Error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A triple component contains the delimiter
    InvalidTriple,
    /// The backing ordered store could not complete an operation
    StoreUnavailable,
    /// A key read back from the store does not have three components
    CorruptKey,
    /// A lexicographic range bound is malformed
    InvalidRange,
    /// Configuration errors
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidTriple => "invalid_triple",
            ErrorKind::StoreUnavailable => "store_unavailable",
            ErrorKind::CorruptKey => "corrupt_key",
            ErrorKind::InvalidRange => "invalid_range",
            ErrorKind::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hexastore error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct HexError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl HexError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn invalid_triple(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidTriple, message)
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, message)
    }

    pub fn corrupt_key(key: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::CorruptKey,
            format!("Malformed permutation key (expected three components): {}", key.into()),
        )
    }

    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRange, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn is_store_unavailable(&self) -> bool {
        self.kind == ErrorKind::StoreUnavailable
    }
}

// SQLite error conversions
#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for HexError {
    fn from(err: rusqlite::Error) -> Self {
        HexError::store_unavailable(format!("SQLite error: {}", err)).with_source(err)
    }
}

// Configuration loading
impl From<serde_yaml::Error> for HexError {
    fn from(err: serde_yaml::Error) -> Self {
        HexError::config(format!("YAML parsing error: {}", err)).with_source(err)
    }
}

impl From<std::io::Error> for HexError {
    fn from(err: std::io::Error) -> Self {
        HexError::config(format!("IO error: {}", err)).with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, HexError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let err = HexError::invalid_triple("subject contains '|'");
        assert_eq!(format!("{}", err), "[invalid_triple] subject contains '|'");
    }

    #[test]
    fn test_store_unavailable() {
        let err = HexError::store_unavailable("connection refused");
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
        assert!(err.is_store_unavailable());
        assert!(err.source.is_none());
    }

    #[test]
    fn test_corrupt_key_message() {
        let err = HexError::corrupt_key("a|b");
        assert_eq!(err.kind, ErrorKind::CorruptKey);
        assert!(err.message.contains("a|b"));
        assert!(!err.is_store_unavailable());
    }

    #[test]
    fn test_with_source() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer");
        let err = HexError::store_unavailable("range scan failed").with_source(io_err);

        let source = err.source().unwrap();
        assert!(source.to_string().contains("reset by peer"));
    }

    #[test]
    fn test_error_kind_as_str() {
        assert_eq!(ErrorKind::InvalidTriple.as_str(), "invalid_triple");
        assert_eq!(ErrorKind::StoreUnavailable.as_str(), "store_unavailable");
        assert_eq!(ErrorKind::CorruptKey.as_str(), "corrupt_key");
        assert_eq!(ErrorKind::InvalidRange.as_str(), "invalid_range");
        assert_eq!(ErrorKind::Config.as_str(), "config");
    }

    #[test]
    fn test_from_io_error_is_config() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: HexError = io_err.into();
        assert_eq!(err.kind, ErrorKind::Config);
        assert!(err.message.contains("IO error"));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_from_rusqlite_error() {
        let err: HexError = rusqlite::Error::QueryReturnedNoRows.into();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
        assert!(err.message.contains("SQLite error"));
        assert!(err.source.is_some());
    }

    #[test]
    fn test_result_propagation() {
        fn inner() -> Result<()> {
            Err(HexError::store_unavailable("down"))
        }

        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    }
}
