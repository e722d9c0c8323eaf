//! Runtime configuration sourced from the environment.
//!
//! All settings come from environment variables (a `.env` file loaded by the
//! binary is just another way to populate them):
//!
//! - `PROTOCOLS_FILE_PATH` — path to the protocol schema document (required)
//! - `SERIAL_PORT` — serial device identifier (required)
//! - `SERIAL_BAUDRATE` — baud rate, default 4800
//! - `SERIAL_TIMEOUT` — read timeout in seconds, default 1.0
//! - `PACKET_TIMEOUT` — packet idle threshold in seconds, default 0.1
//!
//! Presence and type are validated once at startup; a missing required
//! variable or an unparsable value is a [`Configuration`] error naming the
//! variable.
//!
//! [`Configuration`]: crate::error::SerialwireError::Configuration

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, SerialwireError};

/// Default baud rate when `SERIAL_BAUDRATE` is not set.
pub const DEFAULT_BAUD_RATE: u32 = 4800;

/// Default read timeout when `SERIAL_TIMEOUT` is not set.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Default packet idle threshold when `PACKET_TIMEOUT` is not set.
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_millis(100);

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the protocol schema document.
    pub schema_path: PathBuf,
    /// Serial device identifier (e.g. `/dev/ttyUSB0`, `COM3`).
    pub device: String,
    /// Serial baud rate.
    pub baud_rate: u32,
    /// Read timeout for the serial device.
    pub read_timeout: Duration,
    /// Minimum inter-byte gap treated as a frame boundary.
    pub idle_threshold: Duration,
}

impl Config {
    /// Build a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SerialwireError::Configuration`] when a required variable is
    /// missing or a value cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let schema_path = required("PROTOCOLS_FILE_PATH")?.into();
        let device = required("SERIAL_PORT")?;
        let baud_rate = parsed("SERIAL_BAUDRATE", DEFAULT_BAUD_RATE)?;
        let read_timeout = seconds("SERIAL_TIMEOUT", DEFAULT_READ_TIMEOUT)?;
        let idle_threshold = seconds("PACKET_TIMEOUT", DEFAULT_IDLE_THRESHOLD)?;

        Ok(Self {
            schema_path,
            device,
            baud_rate,
            read_timeout,
            idle_threshold,
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name)
        .map_err(|_| SerialwireError::Configuration(format!("{} is not set", name)))
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| {
            SerialwireError::Configuration(format!("{} is not a valid value: {:?}", name, raw))
        }),
        Err(_) => Ok(default),
    }
}

/// Parse a variable holding a duration expressed in (possibly fractional)
/// seconds.
fn seconds(name: &str, default: Duration) -> Result<Duration> {
    let secs: f64 = match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| {
            SerialwireError::Configuration(format!("{} is not a valid number: {:?}", name, raw))
        })?,
        Err(_) => return Ok(default),
    };

    if !secs.is_finite() || secs < 0.0 {
        return Err(SerialwireError::Configuration(format!(
            "{} must be a non-negative number of seconds, got {}",
            name, secs
        )));
    }

    Ok(Duration::from_secs_f64(secs))
}
