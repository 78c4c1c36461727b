//! Error types for send operations.

use std::fmt;

use thiserror::Error;

/// Opaque application error code carried through error completions.
///
/// The sender never interprets the value. It is chosen by the caller when
/// cancelling, or taken from [`SenderConfig`](crate::SenderConfig) for
/// connection-level failures, and handed back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(i32);

impl ErrorCode {
    /// Create an error code from a raw value.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Raw value of this code.
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code {}", self.0)
    }
}

/// Errors returned when a send or cancel request is refused at call time.
///
/// A refusal means the operation did not start: nothing was enqueued and
/// no completion will ever fire for it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderError {
    /// A cancellation is outstanding; new work is refused until it completes
    #[error("cancellation in progress")]
    CancelInProgress,

    /// The sender has shut down and will never transmit again
    #[error("sender is shut down")]
    ShutDown,
}

/// Terminal failure of a single queued send.
///
/// Carries how many bytes the sink acknowledged before the failure, and
/// the error code supplied by whichever path failed the operation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("send failed after {bytes_acked} acked bytes ({code})")]
pub struct SendFailure {
    /// Bytes acknowledged by the sink before the failure.
    pub bytes_acked: usize,

    /// Error code describing the failure.
    pub code: ErrorCode,
}

/// Terminal outcome of one send operation: total acknowledged bytes on
/// success, or the failure record.
pub type SendResult = Result<usize, SendFailure>;
