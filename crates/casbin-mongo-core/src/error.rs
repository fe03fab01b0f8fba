//! Error types for the policy adapter

use thiserror::Error;

/// Result type alias for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Main error type for the policy adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The driver rejected the connection string or the server is unreachable
    #[error("Connection error: {0}")]
    Connection(String),

    /// An operation was issued while the adapter is closed
    #[error("MongoDB is not connected")]
    NotConnected,

    /// A query or write failed in the store
    #[error("Operation failed: {0}")]
    Operation(String),

    /// A stored document could not be read as a rule
    #[error("Invalid rule record: {0}")]
    InvalidRecord(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),
}

impl AdapterError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a new operation error
    pub fn operation(message: impl Into<String>) -> Self {
        Self::Operation(message.into())
    }

    /// Create a new invalid record error
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord(message.into())
    }

    /// Whether the error means the adapter has no open connection
    pub fn is_not_connected(&self) -> bool {
        matches!(self, Self::NotConnected)
    }
}

impl From<std::io::Error> for AdapterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<mongodb::error::Error> for AdapterError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Operation(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AdapterError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        Self::InvalidRecord(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_connected_message() {
        let err = AdapterError::NotConnected;
        assert_eq!(err.to_string(), "MongoDB is not connected");
        assert!(err.is_not_connected());
    }

    #[test]
    fn test_constructors() {
        assert_eq!(
            AdapterError::config("missing uri"),
            AdapterError::Config("missing uri".to_string())
        );
        assert_eq!(
            AdapterError::operation("boom").to_string(),
            "Operation failed: boom"
        );
        assert!(!AdapterError::connection("refused").is_not_connected());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: AdapterError = io.into();
        assert!(matches!(err, AdapterError::Io(msg) if msg.contains("no such file")));
    }
}
