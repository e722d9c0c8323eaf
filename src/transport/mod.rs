//! Transport module - serial device handling.
//!
//! The framer only needs `AsyncRead`; this module is the one place that
//! knows the byte source is a serial port.

mod serial;

pub use serial::open_serial;
