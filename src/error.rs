//! Error types for serialwire.

use thiserror::Error;

/// Main error type for all serialwire operations.
///
/// Every variant is a startup-time, fatal condition except [`Io`], which
/// covers read failures on an already-open byte source (also fatal — there is
/// no reconnection policy). An unrecognized protocol identifier is *not* an
/// error; the decoder reports it as a normal outcome.
///
/// [`Io`]: SerialwireError::Io
#[derive(Debug, Error)]
pub enum SerialwireError {
    /// A required configuration setting is missing or unparsable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The protocol schema file does not exist.
    #[error("protocol schema not found at {path}: {source}")]
    SchemaNotFound {
        /// Path that was looked up.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// The protocol schema file is not valid structured data.
    #[error("invalid protocol schema at {path}: {source}")]
    SchemaFormat {
        /// Path of the offending document.
        path: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The serial device could not be opened.
    #[error("failed to open serial device {device}: {source}")]
    Connection {
        /// Device identifier from configuration.
        device: String,
        /// Underlying serial error.
        #[source]
        source: tokio_serial::Error,
    },

    /// I/O error while reading from the byte source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using SerialwireError.
pub type Result<T> = std::result::Result<T, SerialwireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_trigger() {
        let err = SerialwireError::Configuration("PROTOCOLS_FILE_PATH is not set".into());
        assert!(err.to_string().contains("PROTOCOLS_FILE_PATH"));

        let err = SerialwireError::SchemaNotFound {
            path: "/etc/protocols.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("/etc/protocols.json"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: SerialwireError = io.into();
        assert!(matches!(err, SerialwireError::Io(_)));
    }
}
