//! A single queued send operation and the caller-side completion handles.
//!
//! Each accepted send is tracked by a [`PendingSend`] until it resolves.
//! Resolution is exactly-once by construction: the completion channel is
//! consumed when fired, and dropping an unresolved record fires the error
//! path as a backstop, so an accepted send can never vanish silently.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::error::{ErrorCode, SendFailure, SendResult};

/// One caller-issued send operation, tracked until terminal resolution.
///
/// Progress counters follow the payload through the sender:
/// `bytes_acked <= bytes_sent <= payload_len()` at all times.
pub(crate) struct PendingSend {
    /// Payload handed over by the caller for the lifetime of the operation.
    data: Vec<u8>,

    /// Bytes already pushed to the sink.
    bytes_sent: usize,

    /// Bytes confirmed by the sink.
    bytes_acked: usize,

    /// Completion channel, taken exactly once.
    completion: Option<oneshot::Sender<SendResult>>,

    /// Code reported if this operation is dropped unresolved.
    fatal_error: ErrorCode,
}

impl PendingSend {
    /// Create a tracked send and the handle its caller keeps.
    pub(crate) fn new(data: Vec<u8>, fatal_error: ErrorCode) -> (Self, SendHandle) {
        let (tx, rx) = oneshot::channel();
        let send = Self {
            data,
            bytes_sent: 0,
            bytes_acked: 0,
            completion: Some(tx),
            fatal_error,
        };
        let handle = SendHandle {
            outcome: rx,
            resolved: None,
            fatal_error,
        };
        (send, handle)
    }

    /// Length of the payload in bytes.
    pub(crate) fn payload_len(&self) -> usize {
        self.data.len()
    }

    /// Bytes not yet pushed to the sink.
    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.bytes_sent
    }

    /// Whether every byte of the payload has been pushed.
    pub(crate) fn is_fully_sent(&self) -> bool {
        self.bytes_sent == self.data.len()
    }

    /// Whether every byte of the payload has been acknowledged.
    pub(crate) fn is_fully_acked(&self) -> bool {
        self.bytes_acked == self.data.len()
    }

    /// Next contiguous chunk to push, at most `max` bytes long.
    pub(crate) fn next_chunk(&self, max: usize) -> &[u8] {
        let end = self.bytes_sent + self.remaining().min(max);
        &self.data[self.bytes_sent..end]
    }

    /// Record `n` bytes as pushed to the sink.
    pub(crate) fn record_pushed(&mut self, n: usize) {
        debug_assert!(n <= self.remaining(), "pushed past the end of the payload");
        self.bytes_sent += n;
    }

    /// Consume acknowledgment budget, bounded by the pushed-but-unacked span.
    ///
    /// Returns `true` once every byte of the payload is acknowledged. An
    /// entry that is only partially pushed can never return `true` here,
    /// since acknowledgments never outrun pushes.
    pub(crate) fn apply_ack(&mut self, budget: &mut usize) -> bool {
        let take = (*budget).min(self.bytes_sent - self.bytes_acked);
        self.bytes_acked += take;
        *budget -= take;
        self.is_fully_acked()
    }

    /// Resolve successfully with the total acknowledged byte count.
    pub(crate) fn complete(mut self) {
        debug_assert!(self.is_fully_acked(), "completing a partially acked send");
        if let Some(tx) = self.completion.take() {
            let _ = tx.send(Ok(self.bytes_acked));
        }
    }

    /// Resolve with an error carrying the current acknowledged progress.
    pub(crate) fn fail(mut self, code: ErrorCode) {
        if let Some(tx) = self.completion.take() {
            let _ = tx.send(Err(SendFailure {
                bytes_acked: self.bytes_acked,
                code,
            }));
        }
    }
}

impl Drop for PendingSend {
    fn drop(&mut self) {
        if let Some(tx) = self.completion.take() {
            tracing::warn!(
                bytes_sent = self.bytes_sent,
                bytes_acked = self.bytes_acked,
                "send dropped without resolution, reporting fatal error"
            );
            let _ = tx.send(Err(SendFailure {
                bytes_acked: self.bytes_acked,
                code: self.fatal_error,
            }));
        }
    }
}

/// Caller-side handle resolving to a send's terminal outcome.
///
/// Await it to receive either the total acknowledged byte count or the
/// failure that ended the operation. Once resolved, the outcome is cached:
/// [`try_outcome`](Self::try_outcome) and repeated polls keep returning the
/// same value. Dropping the handle abandons interest without affecting the
/// operation itself.
#[derive(Debug)]
pub struct SendHandle {
    outcome: oneshot::Receiver<SendResult>,
    resolved: Option<SendResult>,
    fatal_error: ErrorCode,
}

impl SendHandle {
    /// The outcome, if the operation has already resolved.
    ///
    /// Returns `None` while the operation is still in flight. Never
    /// blocks and needs no runtime.
    pub fn try_outcome(&mut self) -> Option<SendResult> {
        if self.resolved.is_none() {
            self.resolved = match self.outcome.try_recv() {
                Ok(outcome) => Some(outcome),
                Err(TryRecvError::Empty) => None,
                // The tracked send disappeared without resolving; the
                // drop backstop makes this unreachable short of a leak.
                Err(TryRecvError::Closed) => Some(Err(SendFailure {
                    bytes_acked: 0,
                    code: self.fatal_error,
                })),
            };
        }
        self.resolved
    }
}

impl Future for SendHandle {
    type Output = SendResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(outcome) = this.resolved {
            return Poll::Ready(outcome);
        }
        match Pin::new(&mut this.outcome).poll(cx) {
            Poll::Ready(Ok(outcome)) => {
                this.resolved = Some(outcome);
                Poll::Ready(outcome)
            }
            Poll::Ready(Err(_)) => {
                let outcome = Err(SendFailure {
                    bytes_acked: 0,
                    code: this.fatal_error,
                });
                this.resolved = Some(outcome);
                Poll::Ready(outcome)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Caller-side handle resolving once a cancellation has fully drained.
///
/// Resolves after every send that was awaiting acknowledgment at cancel
/// time has itself resolved. Like [`SendHandle`], the completed state is
/// cached and stays observable.
#[derive(Debug)]
pub struct CancelHandle {
    done: oneshot::Receiver<()>,
    complete: bool,
}

impl CancelHandle {
    pub(crate) fn new(done: oneshot::Receiver<()>) -> Self {
        Self {
            done,
            complete: false,
        }
    }

    /// Whether the cancellation has already completed.
    ///
    /// Never blocks and needs no runtime.
    pub fn is_complete(&mut self) -> bool {
        if !self.complete {
            self.complete = !matches!(self.done.try_recv(), Err(TryRecvError::Empty));
        }
        self.complete
    }
}

impl Future for CancelHandle {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.complete {
            return Poll::Ready(());
        }
        match Pin::new(&mut this.done).poll(cx) {
            Poll::Ready(_) => {
                this.complete = true;
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
