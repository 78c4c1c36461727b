//! Buffer capacity accounting for pushes to the sink.

/// Tracks how many bytes may currently be pushed ahead of acknowledgment.
///
/// The budget starts at the configured buffer size, shrinks as bytes are
/// pushed and grows back as the sink acknowledges them, always staying
/// within `0..=buffer_size`.
#[derive(Debug)]
pub(crate) struct FlowController {
    /// Bytes currently permitted to be pushed.
    available: usize,

    /// Configured upper bound on outstanding bytes.
    buffer_size: usize,
}

impl FlowController {
    /// Create a controller with the full buffer available.
    pub(crate) fn new(buffer_size: usize) -> Self {
        Self {
            available: buffer_size,
            buffer_size,
        }
    }

    /// Bytes currently permitted to be pushed.
    pub(crate) fn available(&self) -> usize {
        self.available
    }

    /// Spend budget for pushed bytes.
    pub(crate) fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.available, "push exceeds available capacity");
        self.available = self.available.saturating_sub(n);
    }

    /// Return budget for acknowledged bytes, clamped to the buffer size.
    ///
    /// A well-behaved sink only acknowledges bytes that were pushed, so
    /// the clamp never triggers in normal operation.
    pub(crate) fn replenish(&mut self, n: usize) {
        let replenished = self.available.saturating_add(n);
        if replenished > self.buffer_size {
            tracing::warn!(
                acked = n,
                available = self.available,
                buffer_size = self.buffer_size,
                "acknowledgment exceeds buffer size, clamping capacity"
            );
        }
        self.available = replenished.min(self.buffer_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_full_buffer() {
        let flow = FlowController::new(10);
        assert_eq!(flow.available(), 10);
    }

    #[test]
    fn test_consume_and_replenish_round_trip() {
        let mut flow = FlowController::new(10);
        flow.consume(7);
        assert_eq!(flow.available(), 3);
        flow.replenish(7);
        assert_eq!(flow.available(), 10);
    }

    #[test]
    fn test_replenish_clamps_to_buffer_size() {
        let mut flow = FlowController::new(10);
        flow.consume(2);
        flow.replenish(5);
        assert_eq!(flow.available(), 10, "capacity must not exceed the buffer size");
    }

    #[test]
    fn test_consume_all_then_partial_replenish() {
        let mut flow = FlowController::new(5);
        flow.consume(5);
        assert_eq!(flow.available(), 0);
        flow.replenish(2);
        assert_eq!(flow.available(), 2);
    }
}
