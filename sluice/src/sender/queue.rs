//! Dual-queue bookkeeping for queued sends.

use std::collections::VecDeque;

use crate::error::ErrorCode;

use super::pending::PendingSend;

/// Ordered queues tracking each send from acceptance to resolution.
///
/// `pending` holds sends not yet fully pushed to the sink, `awaiting_ack`
/// holds sends fully pushed and waiting on acknowledgment. A send lives
/// in exactly one of the two until it resolves, and both queues keep
/// strict arrival order.
#[derive(Default)]
pub(crate) struct SendQueue {
    /// Sends not yet fully pushed, oldest first.
    pending: VecDeque<PendingSend>,

    /// Sends fully pushed, oldest first. Acknowledgments retire the head.
    awaiting_ack: VecDeque<PendingSend>,
}

impl SendQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a freshly accepted send.
    pub(crate) fn push_pending(&mut self, send: PendingSend) {
        self.pending.push_back(send);
    }

    /// Head of the not-yet-pushed queue, if any.
    pub(crate) fn pending_head_mut(&mut self) -> Option<&mut PendingSend> {
        self.pending.front_mut()
    }

    /// Move the fully pushed head of `pending` to the tail of `awaiting_ack`.
    pub(crate) fn promote_head(&mut self) {
        if let Some(head) = self.pending.pop_front() {
            debug_assert!(head.is_fully_sent(), "promoting a partially pushed send");
            self.awaiting_ack.push_back(head);
        }
    }

    /// Apply `n` acknowledged bytes, oldest send first.
    ///
    /// Sends at the head of `awaiting_ack` that become fully acknowledged
    /// resolve successfully. Budget left over once `awaiting_ack` empties
    /// lands on the partially pushed head of `pending`, which can never
    /// resolve from acknowledgment alone. Returns the number of sends
    /// that resolved and any budget that matched no queued bytes.
    pub(crate) fn apply_ack(&mut self, n: usize) -> (usize, usize) {
        let mut budget = n;
        let mut retired = 0;
        while let Some(head) = self.awaiting_ack.front_mut() {
            if !head.apply_ack(&mut budget) {
                break;
            }
            if let Some(done) = self.awaiting_ack.pop_front() {
                tracing::trace!(bytes = done.payload_len(), "send fully acknowledged");
                done.complete();
                retired += 1;
            }
        }
        if budget > 0 {
            if let Some(head) = self.pending.front_mut() {
                let finished = head.apply_ack(&mut budget);
                debug_assert!(!finished, "partially pushed send resolved by acknowledgment");
            }
        }
        (retired, budget)
    }

    /// Resolve sends at the head of `awaiting_ack` that need no further
    /// acknowledgment. Zero-length payloads arrive here already satisfied.
    pub(crate) fn retire_fully_acked(&mut self) -> usize {
        let mut retired = 0;
        while self.awaiting_ack.front().is_some_and(|s| s.is_fully_acked()) {
            if let Some(done) = self.awaiting_ack.pop_front() {
                done.complete();
                retired += 1;
            }
        }
        retired
    }

    /// Fail every send in `pending` with `code`, oldest first.
    pub(crate) fn fail_all_pending(&mut self, code: ErrorCode) -> usize {
        let mut failed = 0;
        while let Some(send) = self.pending.pop_front() {
            send.fail(code);
            failed += 1;
        }
        failed
    }

    /// Fail every send in `awaiting_ack` with `code`, oldest first.
    ///
    /// Each entry reports its own acknowledged progress alongside the code.
    pub(crate) fn fail_all_awaiting(&mut self, code: ErrorCode) -> usize {
        let mut failed = 0;
        while let Some(send) = self.awaiting_ack.pop_front() {
            send.fail(code);
            failed += 1;
        }
        failed
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn awaiting_len(&self) -> usize {
        self.awaiting_ack.len()
    }

    pub(crate) fn pending_is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub(crate) fn awaiting_is_empty(&self) -> bool {
        self.awaiting_ack.is_empty()
    }
}
