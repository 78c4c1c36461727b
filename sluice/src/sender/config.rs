//! Configuration for sender behavior.

use crate::error::ErrorCode;

/// Configuration for a [`DataSender`](crate::DataSender).
#[derive(Clone, Debug)]
pub struct SenderConfig {
    /// Sink buffer budget in bytes.
    ///
    /// At most this many bytes may be pushed ahead of acknowledgment;
    /// it is the upper bound on `available_capacity` for the sender's
    /// whole lifetime.
    pub buffer_size: usize,

    /// Error code reported to every unresolved send when the channel
    /// suffers a connection-level failure.
    pub fatal_error: ErrorCode,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            buffer_size: 4096,
            fatal_error: ErrorCode::new(-1),
        }
    }
}

impl SenderConfig {
    /// Create a configuration with the given buffer budget and fatal code.
    pub fn new(buffer_size: usize, fatal_error: ErrorCode) -> Self {
        Self {
            buffer_size,
            fatal_error,
        }
    }

    /// Set the buffer budget.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Set the fatal error code.
    pub fn with_fatal_error(mut self, fatal_error: ErrorCode) -> Self {
        self.fatal_error = fatal_error;
        self
    }
}
