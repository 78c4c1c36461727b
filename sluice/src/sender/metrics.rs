//! Counters describing sender activity.

/// Point-in-time counters and gauges for a sender.
///
/// Obtained from [`DataSender::metrics`](crate::DataSender::metrics).
/// Counters accumulate over the sender's lifetime; the queue gauges and
/// the shut-down flag reflect the moment of the call.
#[derive(Debug, Clone, Default)]
pub struct SenderMetrics {
    /// Sends accepted into the queue.
    pub sends_accepted: u64,

    /// Sends refused at call time.
    pub sends_rejected: u64,

    /// Sends resolved successfully.
    pub sends_completed: u64,

    /// Sends resolved with an error.
    pub sends_failed: u64,

    /// Cancellation requests accepted.
    pub cancels_requested: u64,

    /// Cancellations that finished draining.
    pub cancels_completed: u64,

    /// Payload bytes accepted for sending.
    pub bytes_accepted: u64,

    /// Bytes pushed to the sink.
    pub bytes_pushed: u64,

    /// Bytes acknowledged by the sink.
    pub bytes_acked: u64,

    /// Sends not yet fully pushed, at observation time.
    pub pending_queue_size: usize,

    /// Sends awaiting acknowledgment, at observation time.
    pub awaiting_ack_size: usize,

    /// Whether the sender has reached its terminal state.
    pub shut_down: bool,
}

impl SenderMetrics {
    /// Create a zeroed metrics instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted send of `bytes` payload bytes.
    pub fn record_send_accepted(&mut self, bytes: usize) {
        self.sends_accepted += 1;
        self.bytes_accepted += bytes as u64;
    }

    /// Record a send or cancel refused at call time.
    pub fn record_send_rejected(&mut self) {
        self.sends_rejected += 1;
    }

    /// Record `count` sends resolved successfully.
    pub fn record_sends_completed(&mut self, count: usize) {
        self.sends_completed += count as u64;
    }

    /// Record `count` sends resolved with an error.
    pub fn record_sends_failed(&mut self, count: usize) {
        self.sends_failed += count as u64;
    }

    /// Record an accepted cancellation request.
    pub fn record_cancel_requested(&mut self) {
        self.cancels_requested += 1;
    }

    /// Record a cancellation that finished draining.
    pub fn record_cancel_completed(&mut self) {
        self.cancels_completed += 1;
    }

    /// Record `bytes` pushed to the sink.
    pub fn record_bytes_pushed(&mut self, bytes: usize) {
        self.bytes_pushed += bytes as u64;
    }

    /// Record `bytes` acknowledged by the sink.
    pub fn record_bytes_acked(&mut self, bytes: usize) {
        self.bytes_acked += bytes as u64;
    }

    /// Fraction of accepted sends that resolved successfully, as a
    /// percentage. Reads 100 while nothing has been accepted.
    pub fn completion_rate(&self) -> f64 {
        if self.sends_accepted == 0 {
            100.0
        } else {
            (self.sends_completed as f64 / self.sends_accepted as f64) * 100.0
        }
    }
}
