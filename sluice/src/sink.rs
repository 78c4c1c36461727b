//! Sink abstraction: where pushed bytes go and how their fate comes back.

use tokio::sync::mpsc;

use crate::error::ErrorCode;

/// Receiving endpoint for flow-controlled pushes.
///
/// The sender calls [`push_data`](Self::push_data) with chunks already
/// cut to the available capacity, so an implementation never needs to
/// buffer more than it agreed to. Acknowledgments travel back out of
/// band as [`SinkEvent`]s.
pub trait DataSink {
    /// Accept one chunk of payload bytes.
    ///
    /// Returns `false` if the sink can no longer take data at all. A
    /// refusal is terminal for the channel, not a retry signal: the
    /// sender shuts down and fails everything still queued.
    fn push_data(&mut self, chunk: &[u8]) -> bool;
}

/// Feedback from the sink about previously pushed bytes.
///
/// Counts are cumulative across pushes, in push order, and may cover a
/// prefix of one send or span several.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkEvent {
    /// `count` more bytes have been delivered and acknowledged.
    BytesAcked(usize),

    /// `count` more bytes were acknowledged, then the channel failed
    /// with `code`. Terminal.
    BytesAckedWithError {
        /// Bytes acknowledged before the failure.
        count: usize,
        /// Application error code describing the failure.
        code: ErrorCode,
    },

    /// The underlying channel is gone. Terminal.
    ConnectionLost,
}

/// [`DataSink`] forwarding each chunk over an unbounded channel.
///
/// The receiving half is handed to whatever task performs the actual
/// I/O. Chunks are copied out of the sender's buffers at push time, so
/// the receiver owns its data outright.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    chunks: mpsc::UnboundedSender<Vec<u8>>,
}

impl ChannelSink {
    /// Create a sink and the receiver its chunks arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Vec<u8>>) {
        let (chunks, rx) = mpsc::unbounded_channel();
        (Self { chunks }, rx)
    }
}

impl DataSink for ChannelSink {
    fn push_data(&mut self, chunk: &[u8]) -> bool {
        self.chunks.send(chunk.to_vec()).is_ok()
    }
}
