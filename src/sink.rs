//! Output sinks for decoded frames.
//!
//! Each completed frame is delivered to a [`FrameSink`]. The default is one
//! console line per frame; anything that can consume a [`DecodedFrame`] (a
//! structured logger, a message bus producer, a `Vec` in tests) can stand in.

use std::io::Write;

use crate::decoder::DecodedFrame;

/// Consumer of decoded frames, invoked once per completed frame in emission
/// order.
pub trait FrameSink {
    /// Deliver one decoded frame.
    fn emit(&mut self, frame: &DecodedFrame);
}

/// Sink that writes one line per frame to stdout:
///
/// ```text
/// Protocol: Ping, Data: {"command":1,"seq":7}
/// ```
///
/// Writes an explicit `\n` and flushes each line, so a parent process reading
/// the stream sees complete lines. Logging goes to stderr via `tracing`, not
/// here.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// Create a new console sink.
    pub fn new() -> Self {
        Self
    }
}

impl FrameSink for ConsoleSink {
    fn emit(&mut self, frame: &DecodedFrame) {
        let fields = serde_json::to_string(&frame.fields)
            .expect("field map serialization should not fail");

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        if let Err(e) = handle
            .write_all(format!("Protocol: {}, Data: {}\n", frame.protocol, fields).as_bytes())
            .and_then(|_| handle.flush())
        {
            tracing::warn!("failed to write frame to stdout: {}", e);
        }
    }
}

/// Collecting sink, mainly for tests.
impl FrameSink for Vec<DecodedFrame> {
    fn emit(&mut self, frame: &DecodedFrame) {
        self.push(frame.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn frame(protocol: &str, fields: &[(&str, u8)]) -> DecodedFrame {
        DecodedFrame {
            protocol: protocol.to_string(),
            fields: fields
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
        }
    }

    #[test]
    fn test_vec_sink_preserves_order() {
        let mut sink: Vec<DecodedFrame> = Vec::new();

        sink.emit(&frame("Ping", &[("command", 1), ("seq", 7)]));
        sink.emit(&frame("Unknown Protocol", &[]));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].protocol, "Ping");
        assert_eq!(sink[1].protocol, "Unknown Protocol");
    }

    #[test]
    fn test_field_map_renders_as_json() {
        let frame = frame("Ping", &[("command", 1), ("seq", 7)]);
        let rendered = serde_json::to_string(&frame.fields).unwrap();
        // BTreeMap keys are ordered, so the rendering is stable.
        assert_eq!(rendered, r#"{"command":1,"seq":7}"#);
    }

    #[test]
    fn test_console_sink_does_not_panic() {
        let mut sink = ConsoleSink::new();
        sink.emit(&frame("Ping", &[("seq", 7)]));
        sink.emit(&DecodedFrame {
            protocol: "Empty".to_string(),
            fields: BTreeMap::new(),
        });
    }
}
