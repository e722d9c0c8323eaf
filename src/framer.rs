//! Packet framer - idle-timeout frame boundary detection.
//!
//! The wire protocol has no length prefix or terminator, so the only framing
//! signal is a pause in byte arrival. [`PacketFramer`] accumulates bytes in a
//! `bytes::BytesMut` buffer and implements a two-state machine:
//!
//! - `Idle`: buffer empty, nothing to emit
//! - `Accumulating`: buffer non-empty; once no byte has arrived for the idle
//!   threshold, the buffer is one complete frame
//!
//! [`run_framer`] drives the machine from any `AsyncRead` byte source using
//! reads bounded by `tokio::time::timeout`, so no busy polling is needed.
//! Frames decode and reach the sink strictly in arrival order.
//!
//! The framer is a heuristic: it assumes the device pauses between messages
//! longer than the inter-byte spacing at the configured baud rate. A frame
//! straddling a false-positive gap is decoded as-is.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::{timeout, Duration, Instant};

use crate::decoder::decode;
use crate::error::Result;
use crate::schema::SchemaRegistry;
use crate::sink::FrameSink;

/// Read chunk size. Generous for serial baud rates; a single read may carry
/// many bytes after a scheduling hiccup.
const READ_CHUNK: usize = 256;

/// Framing state.
#[derive(Debug, Clone, Copy)]
enum State {
    /// Buffer empty.
    Idle,
    /// Buffer non-empty; `last_arrival` is refreshed on every byte.
    Accumulating { last_arrival: Instant },
}

/// Accumulates incoming bytes and detects frame boundaries by inter-byte
/// idle time.
///
/// The buffer is exclusively owned by whichever loop drives the framer; an
/// emitted frame is a snapshot of exactly the bytes accumulated since the
/// last emission.
#[derive(Debug)]
pub struct PacketFramer {
    /// Accumulated bytes since the last emission.
    buffer: BytesMut,
    /// Current framing state.
    state: State,
    /// Minimum gap treated as a frame boundary.
    idle_threshold: Duration,
}

impl PacketFramer {
    /// Create a framer with the given idle threshold.
    pub fn new(idle_threshold: Duration) -> Self {
        Self {
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: State::Idle,
            idle_threshold,
        }
    }

    /// Append received bytes, refreshing the arrival timestamp.
    pub fn push(&mut self, data: &[u8], now: Instant) {
        if data.is_empty() {
            return;
        }
        self.buffer.extend_from_slice(data);
        self.state = State::Accumulating { last_arrival: now };
    }

    /// Emit the buffered frame if the idle threshold has been crossed.
    ///
    /// Returns `None` while bytes are still arriving, and always `None` in
    /// the `Idle` state: an idle link with an empty buffer never produces a
    /// spurious frame.
    pub fn check_idle(&mut self, now: Instant) -> Option<Bytes> {
        match self.state {
            State::Accumulating { last_arrival }
                if now.duration_since(last_arrival) >= self.idle_threshold =>
            {
                Some(self.take_frame())
            }
            _ => None,
        }
    }

    /// Emit whatever is buffered, regardless of timing.
    ///
    /// Used when the byte source ends: an unending pause is an idle gap.
    pub fn flush(&mut self) -> Option<Bytes> {
        match self.state {
            State::Accumulating { .. } => Some(self.take_frame()),
            State::Idle => None,
        }
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn take_frame(&mut self) -> Bytes {
        self.state = State::Idle;
        self.buffer.split().freeze()
    }
}

/// Read bytes from `reader` until the stream ends, decoding each completed
/// frame against `registry` and delivering it to `sink`.
///
/// A read that produces no byte within the idle threshold triggers the
/// boundary check, so idle detection needs no separate polling loop. End of
/// stream flushes a pending non-empty buffer as a final frame. A read error
/// is fatal - no retry policy exists.
pub async fn run_framer<R, S>(
    mut reader: R,
    registry: &SchemaRegistry,
    sink: &mut S,
    idle_threshold: Duration,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    S: FrameSink,
{
    let mut framer = PacketFramer::new(idle_threshold);
    let mut buf = [0u8; READ_CHUNK];

    loop {
        match timeout(idle_threshold, reader.read(&mut buf)).await {
            // End of stream: flush the pending frame and stop.
            Ok(Ok(0)) => {
                if let Some(frame) = framer.flush() {
                    emit(&frame, registry, sink);
                }
                tracing::debug!("byte source ended");
                return Ok(());
            }
            Ok(Ok(n)) => framer.push(&buf[..n], Instant::now()),
            Ok(Err(e)) => return Err(e.into()),
            // No byte within the threshold: boundary check.
            Err(_elapsed) => {
                if let Some(frame) = framer.check_idle(Instant::now()) {
                    emit(&frame, registry, sink);
                }
            }
        }
    }
}

fn emit<S: FrameSink>(frame: &[u8], registry: &SchemaRegistry, sink: &mut S) {
    let decoded = decode(frame, registry);
    tracing::debug!(protocol = %decoded.protocol, bytes = frame.len(), "frame complete");
    sink.emit(&decoded);
}
