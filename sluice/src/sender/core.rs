//! Core sender implementation: ordered queuing, flow control, and
//! acknowledgment-driven completion.

use tokio::sync::oneshot;

use crate::error::{ErrorCode, SenderError};
use crate::sink::{DataSink, SinkEvent};

use super::config::SenderConfig;
use super::flow::FlowController;
use super::metrics::SenderMetrics;
use super::pending::{CancelHandle, PendingSend, SendHandle};
use super::queue::SendQueue;

/// Flow-controlled sender pushing caller-supplied payloads to one sink.
///
/// Payloads queue in arrival order and are pushed contiguously, at most
/// `buffer_size` bytes ahead of acknowledgment. The sink acknowledges
/// bytes in push order; acknowledgments resolve the oldest sends first
/// and free capacity for further pushes.
///
/// All methods run on one logical control flow: callers issue
/// [`send`](Self::send)/[`cancel`](Self::cancel), and sink events arrive
/// through [`handle_event`](Self::handle_event) (typically via
/// [`pump_sink_events`](crate::pump_sink_events)). No internal locking.
///
/// Every accepted send resolves exactly once, including on shutdown and
/// on drop of the sender itself.
pub struct DataSender<S: DataSink> {
    /// Exclusive handle to the receiving endpoint.
    sink: S,

    /// Queued sends, from acceptance to resolution.
    queue: SendQueue,

    /// Byte budget for pushes, replenished by acknowledgments.
    flow: FlowController,

    /// Error code applied when the whole channel fails.
    fatal_error: ErrorCode,

    /// Completion for the at-most-one outstanding cancellation.
    pending_cancel: Option<oneshot::Sender<()>>,

    /// Terminal flag; set once, never cleared.
    shut_down: bool,

    /// Counters exposed through [`metrics`](Self::metrics).
    metrics: SenderMetrics,
}

impl<S: DataSink> DataSender<S> {
    /// Create a sender bound to one sink with the given configuration.
    pub fn new(sink: S, config: SenderConfig) -> Self {
        Self {
            sink,
            queue: SendQueue::new(),
            flow: FlowController::new(config.buffer_size),
            fatal_error: config.fatal_error,
            pending_cancel: None,
            shut_down: false,
            metrics: SenderMetrics::new(),
        }
    }

    /// Create a sender with default configuration.
    pub fn with_defaults(sink: S) -> Self {
        Self::new(sink, SenderConfig::default())
    }

    /// Queue `data` for transmission.
    ///
    /// Ownership of the payload moves to the sender until the operation
    /// resolves. The returned handle resolves to the payload length once
    /// every byte is acknowledged, or to a [`SendFailure`] carrying the
    /// acknowledged prefix and an error code.
    ///
    /// Refused, with nothing enqueued and the payload dropped, while a
    /// cancellation is outstanding or after shutdown.
    ///
    /// [`SendFailure`]: crate::SendFailure
    pub fn send(&mut self, data: Vec<u8>) -> Result<SendHandle, SenderError> {
        if self.pending_cancel.is_some() {
            self.metrics.record_send_rejected();
            return Err(SenderError::CancelInProgress);
        }
        if self.shut_down {
            self.metrics.record_send_rejected();
            return Err(SenderError::ShutDown);
        }

        tracing::debug!(
            bytes = data.len(),
            pending = self.queue.pending_len() + 1,
            awaiting_ack = self.queue.awaiting_len(),
            "send accepted"
        );
        self.metrics.record_send_accepted(data.len());
        let (send, handle) = PendingSend::new(data, self.fatal_error);
        self.queue.push_pending(send);
        self.drive_transmission();
        Ok(handle)
    }

    /// Cancel queued work, failing it with `code`.
    ///
    /// Sends not yet fully pushed fail immediately with their current
    /// progress and `code`. Sends already handed to the sink keep
    /// draining naturally; the returned handle resolves once the last of
    /// them has. New sends are refused until then. At most one
    /// cancellation may be outstanding; a cancellation with nothing
    /// awaiting acknowledgment completes immediately.
    pub fn cancel(&mut self, code: ErrorCode) -> Result<CancelHandle, SenderError> {
        if self.pending_cancel.is_some() {
            return Err(SenderError::CancelInProgress);
        }
        if self.shut_down {
            return Err(SenderError::ShutDown);
        }

        let failed = self.queue.fail_all_pending(code);
        self.metrics.record_sends_failed(failed);
        self.metrics.record_cancel_requested();
        tracing::debug!(
            %code,
            failed,
            awaiting_ack = self.queue.awaiting_len(),
            "cancellation requested"
        );

        let (tx, rx) = oneshot::channel();
        self.pending_cancel = Some(tx);
        self.finish_cancel_if_drained();
        Ok(CancelHandle::new(rx))
    }

    /// Feed one sink event into the sender.
    pub fn handle_event(&mut self, event: SinkEvent) {
        match event {
            SinkEvent::BytesAcked(count) => self.report_bytes_sent(count),
            SinkEvent::BytesAckedWithError { count, code } => {
                self.report_bytes_sent_and_error(count, code)
            }
            SinkEvent::ConnectionLost => self.connection_lost(),
        }
    }

    /// Record `count` bytes as acknowledged by the sink.
    ///
    /// Replenishes capacity, resolves fully acknowledged sends oldest
    /// first, then pushes further queued bytes if capacity allows.
    pub fn report_bytes_sent(&mut self, count: usize) {
        if self.shut_down {
            tracing::trace!(count, "acknowledgment after shutdown, ignoring");
            return;
        }

        self.flow.replenish(count);
        let (retired, leftover) = self.queue.apply_ack(count);
        self.metrics.record_bytes_acked(count - leftover);
        self.metrics.record_sends_completed(retired);
        if leftover > 0 {
            tracing::warn!(leftover, "acknowledgment exceeds outstanding bytes");
        }
        tracing::trace!(
            count,
            retired,
            capacity = self.flow.available(),
            "bytes acknowledged"
        );

        self.drive_transmission();
        self.finish_cancel_if_drained();
    }

    /// Record `count` acknowledged bytes followed by a fatal failure of
    /// the next operation.
    ///
    /// Sends fully covered by `count` still complete successfully; every
    /// other queued send fails with `code`, oldest first, and the sender
    /// shuts down. The error ends the whole channel.
    pub fn report_bytes_sent_and_error(&mut self, count: usize, code: ErrorCode) {
        if self.shut_down {
            tracing::trace!(count, %code, "sink error after shutdown, ignoring");
            return;
        }

        self.flow.replenish(count);
        let (retired, leftover) = self.queue.apply_ack(count);
        self.metrics.record_bytes_acked(count - leftover);
        self.metrics.record_sends_completed(retired);
        tracing::debug!(
            count,
            retired,
            %code,
            "sink reported error, failing all queued sends"
        );

        self.shut_down = true;
        let failed = self.queue.fail_all_awaiting(code) + self.queue.fail_all_pending(code);
        self.metrics.record_sends_failed(failed);
        self.finish_cancel_if_drained();
    }

    /// Handle loss of the underlying channel.
    ///
    /// Every remaining send resolves with its current progress and the
    /// configured fatal error code; the sender never transmits again. A
    /// repeated report is a no-op.
    pub fn connection_lost(&mut self) {
        if self.shut_down {
            return;
        }
        tracing::warn!(
            pending = self.queue.pending_len(),
            awaiting_ack = self.queue.awaiting_len(),
            "connection lost, shutting down"
        );
        self.shut_down_with(self.fatal_error);
    }

    /// Whether the sender has reached its terminal state.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Buffer bytes currently available for pushing.
    pub fn available_capacity(&self) -> usize {
        self.flow.available()
    }

    /// Point-in-time counters and gauges for this sender.
    pub fn metrics(&self) -> SenderMetrics {
        let mut metrics = self.metrics.clone();
        metrics.pending_queue_size = self.queue.pending_len();
        metrics.awaiting_ack_size = self.queue.awaiting_len();
        metrics.shut_down = self.shut_down;
        metrics
    }

    /// Push queued bytes while capacity allows, then resolve anything
    /// that needs no further acknowledgment.
    fn drive_transmission(&mut self) {
        let refused = self.flush_pending();
        let retired = self.queue.retire_fully_acked();
        self.metrics.record_sends_completed(retired);
        if refused {
            tracing::warn!("sink refused a chunk, shutting down");
            self.shut_down_with(self.fatal_error);
        }
    }

    /// Transmission loop: push from the head of `pending` in contiguous
    /// chunks of up to `min(available_capacity, remaining)` bytes,
    /// promoting fully pushed sends to `awaiting_ack`.
    ///
    /// Returns `true` if the sink refused a chunk.
    fn flush_pending(&mut self) -> bool {
        loop {
            let budget = self.flow.available();
            let Some(head) = self.queue.pending_head_mut() else {
                break;
            };
            if head.remaining() == 0 {
                self.queue.promote_head();
                continue;
            }
            if budget == 0 {
                break;
            }

            let chunk = head.next_chunk(budget);
            let chunk_len = chunk.len();
            if !self.sink.push_data(chunk) {
                return true;
            }
            head.record_pushed(chunk_len);
            self.flow.consume(chunk_len);
            self.metrics.record_bytes_pushed(chunk_len);
            tracing::trace!(
                chunk = chunk_len,
                capacity = self.flow.available(),
                "chunk pushed to sink"
            );
            if self.queue.pending_head_mut().is_some_and(|h| h.remaining() == 0) {
                self.queue.promote_head();
            }
        }
        false
    }

    /// Resolve every queued send with `code` and enter the terminal state.
    ///
    /// Not-yet-pushed sends resolve first, then the in-flight ones, each
    /// carrying its own acknowledged progress.
    fn shut_down_with(&mut self, code: ErrorCode) {
        self.shut_down = true;
        let failed = self.queue.fail_all_pending(code) + self.queue.fail_all_awaiting(code);
        self.metrics.record_sends_failed(failed);
        self.finish_cancel_if_drained();
    }

    /// Fire the cancellation completion once nothing awaits the sink.
    fn finish_cancel_if_drained(&mut self) {
        if !self.queue.awaiting_is_empty() {
            return;
        }
        if let Some(done) = self.pending_cancel.take() {
            debug_assert!(
                self.queue.pending_is_empty(),
                "pending sends survived an outstanding cancellation"
            );
            tracing::debug!("cancellation complete");
            self.metrics.record_cancel_completed();
            let _ = done.send(());
        }
    }
}

impl<S: DataSink> Drop for DataSender<S> {
    fn drop(&mut self) {
        if !self.shut_down {
            tracing::debug!(
                pending = self.queue.pending_len(),
                awaiting_ack = self.queue.awaiting_len(),
                "sender dropped, resolving outstanding work"
            );
            self.shut_down_with(self.fatal_error);
        }
    }
}
