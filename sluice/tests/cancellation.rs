//! Tests for cancellation: immediate failure of queued work, natural
//! drain of in-flight bytes, and the completion that follows.
//!
//! Tests verify that:
//! - Cancel fails not-yet-pushed sends at once with the supplied code
//! - Bytes already handed to the sink resolve on their own terms
//! - The cancel completion fires only after the in-flight work drains
//! - New sends are refused until the cancellation completes

#[path = "support/mod.rs"]
mod support;

use sluice::{ErrorCode, SendFailure, SenderError};
use support::{init_tracing, local_runtime, sender_with_buffer};

/// One send awaiting acknowledgment, one still queued. Cancel fails the
/// queued send immediately; the in-flight one completes normally and
/// only then does the cancellation resolve.
#[test]
fn test_cancel_fails_queued_sends_and_lets_inflight_drain() {
    init_tracing();
    let (mut sender, probe) = sender_with_buffer(3);

    let mut inflight = sender.send(b"BBB".to_vec()).expect("send accepted");
    let mut queued = sender.send(b"AAA".to_vec()).expect("send accepted");
    assert_eq!(probe.chunk_lens(), vec![3], "queued send never reached the sink");

    let mut cancel = sender.cancel(ErrorCode::new(42)).expect("cancel accepted");
    assert_eq!(
        queued.try_outcome(),
        Some(Err(SendFailure {
            bytes_acked: 0,
            code: ErrorCode::new(42),
        }))
    );
    assert_eq!(inflight.try_outcome(), None, "in-flight bytes keep draining");
    assert!(!cancel.is_complete(), "completion waits for the drain");

    sender.report_bytes_sent(3);
    assert_eq!(inflight.try_outcome(), Some(Ok(3)));
    assert!(cancel.is_complete());
}

/// A partially pushed head fails with the progress it made, and with
/// nothing left in flight the cancellation resolves on the spot.
#[test]
fn test_cancel_reports_progress_for_partially_pushed_head() {
    init_tracing();
    let (mut sender, probe) = sender_with_buffer(5);

    let mut handle = sender.send(b"abcdefghij".to_vec()).expect("send accepted");
    sender.report_bytes_sent(3);
    assert_eq!(probe.chunk_lens(), vec![5, 3], "ack freed budget for more bytes");

    let mut cancel = sender.cancel(ErrorCode::new(7)).expect("cancel accepted");
    assert_eq!(
        handle.try_outcome(),
        Some(Err(SendFailure {
            bytes_acked: 3,
            code: ErrorCode::new(7),
        }))
    );
    assert!(cancel.is_complete(), "nothing awaited the sink");
}

/// Cancelling an idle sender resolves at once; the handle's future is
/// immediately ready.
#[test]
fn test_cancel_of_idle_sender_resolves_immediately() {
    init_tracing();
    let (mut sender, _probe) = sender_with_buffer(4);

    local_runtime().block_on(async move {
        let cancel = sender.cancel(ErrorCode::new(1)).expect("cancel accepted");
        cancel.await;

        let metrics = sender.metrics();
        assert_eq!(metrics.cancels_requested, 1);
        assert_eq!(metrics.cancels_completed, 1);
    });
}

/// While a cancellation is outstanding every new send and every further
/// cancel is refused; once it completes the sender takes work again.
#[test]
fn test_work_refused_until_cancellation_completes() {
    init_tracing();
    let (mut sender, probe) = sender_with_buffer(3);

    let mut inflight = sender.send(b"abc".to_vec()).expect("send accepted");
    let _cancel = sender.cancel(ErrorCode::new(4)).expect("cancel accepted");

    assert!(matches!(
        sender.send(b"x".to_vec()),
        Err(SenderError::CancelInProgress)
    ));
    assert!(matches!(
        sender.cancel(ErrorCode::new(5)),
        Err(SenderError::CancelInProgress)
    ));
    assert_eq!(probe.chunk_lens(), vec![3], "refused work never touches the sink");

    sender.report_bytes_sent(3);
    assert_eq!(inflight.try_outcome(), Some(Ok(3)));

    let mut accepted = sender.send(b"yz".to_vec()).expect("accepted after drain");
    sender.report_bytes_sent(2);
    assert_eq!(accepted.try_outcome(), Some(Ok(2)));
    assert_eq!(probe.chunk_lens(), vec![3, 2]);

    let mut again = sender.cancel(ErrorCode::new(6)).expect("fresh cancel accepted");
    assert!(again.is_complete());
}

/// A connection failure while a cancellation is outstanding still fires
/// the cancel completion: shutdown empties the queues it was waiting on.
#[test]
fn test_cancel_completes_when_connection_drops_inflight_work() {
    init_tracing();
    let (mut sender, _probe) = sender_with_buffer(3);

    let mut inflight = sender.send(b"abc".to_vec()).expect("send accepted");
    let mut cancel = sender.cancel(ErrorCode::new(9)).expect("cancel accepted");
    assert!(!cancel.is_complete());

    sender.connection_lost();
    assert_eq!(
        inflight.try_outcome(),
        Some(Err(SendFailure {
            bytes_acked: 0,
            code: ErrorCode::new(-1),
        })),
        "in-flight send fails with the configured fatal code, not the cancel code"
    );
    assert!(cancel.is_complete());
    assert!(matches!(
        sender.cancel(ErrorCode::new(2)),
        Err(SenderError::ShutDown)
    ));
}
