//! # serialwire
//!
//! Schema-driven decoder for fixed-format binary frames arriving over a
//! serial link.
//!
//! A device emits fixed-layout binary messages with no delimiters; the only
//! framing signal is a pause in byte arrival. serialwire turns that stream
//! into typed, named values:
//!
//! - **Schema registry**: a JSON document maps hexadecimal protocol
//!   identifiers to frame definitions (name, length, per-field byte/mask/
//!   shift layouts), plus a shared `meta` layout applied to every frame.
//! - **Frame decoder**: pure function from frame bytes to a
//!   `(protocol name, field map)` pair, dispatching on the decoded `command`
//!   meta field.
//! - **Packet framer**: accumulates bytes and emits a frame when the link
//!   has been idle for the configured threshold.
//!
//! ## Example
//!
//! ```no_run
//! use serialwire::{run_framer, Config, ConsoleSink, SchemaRegistry};
//!
//! #[tokio::main]
//! async fn main() -> serialwire::Result<()> {
//!     let config = Config::from_env()?;
//!     let registry = SchemaRegistry::load(&config.schema_path)?;
//!     let port = serialwire::transport::open_serial(&config)?;
//!
//!     let mut sink = ConsoleSink::new();
//!     run_framer(port, &registry, &mut sink, config.idle_threshold).await
//! }
//! ```

pub mod config;
pub mod decoder;
pub mod error;
pub mod framer;
pub mod schema;
pub mod sink;
pub mod transport;

pub use config::Config;
pub use decoder::{decode, DecodedFrame, UNKNOWN_PROTOCOL};
pub use error::{Result, SerialwireError};
pub use framer::{run_framer, PacketFramer};
pub use schema::{FieldSpec, Protocol, SchemaRegistry};
pub use sink::{ConsoleSink, FrameSink};
