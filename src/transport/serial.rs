//! Serial port acquisition.
//!
//! Failure to open the device is fatal and surfaces as
//! [`SerialwireError::Connection`]; once open, the stream is plain
//! `AsyncRead` and the rest of the system never sees serial specifics.
//! Dropping the stream releases the device on every exit path.

use tokio_serial::{SerialPortBuilderExt, SerialStream};

use crate::config::Config;
use crate::error::{Result, SerialwireError};

/// Open the configured serial device for reading.
pub fn open_serial(config: &Config) -> Result<SerialStream> {
    tokio_serial::new(config.device.as_str(), config.baud_rate)
        .timeout(config.read_timeout)
        .open_native_async()
        .map_err(|source| SerialwireError::Connection {
            device: config.device.clone(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_open_missing_device_is_connection_error() {
        let config = Config {
            schema_path: "/dev/null".into(),
            device: "/dev/serialwire-test-does-not-exist".into(),
            baud_rate: 4800,
            read_timeout: Duration::from_secs(1),
            idle_threshold: Duration::from_millis(100),
        };

        let err = open_serial(&config).unwrap_err();
        assert!(matches!(err, SerialwireError::Connection { .. }));
        assert!(err.to_string().contains("serialwire-test-does-not-exist"));
    }
}
