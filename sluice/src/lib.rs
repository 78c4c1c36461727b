//! # Sluice
//!
//! Flow-controlled byte-stream sending with acknowledgment-based
//! backpressure.
//!
//! This crate provides:
//! - **DataSender**: Ordered, capacity-bounded delivery of byte payloads
//! - **Per-send completion**: Every accepted send resolves exactly once
//!   with its acknowledged byte count or a failure carrying partial progress
//! - **Cancellation**: Fail queued work immediately while in-flight bytes
//!   drain naturally
//! - **Event pump**: Marshal sink acknowledgments onto the sender's task

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

// =============================================================================
// Modules
// =============================================================================

/// Error types for send operations.
pub mod error;

/// Event pump marshaling sink feedback onto the sender's control flow.
pub mod pump;

/// Flow-controlled sending with acknowledgment-based completion.
pub mod sender;

/// Sink abstraction receiving pushed bytes.
pub mod sink;

// =============================================================================
// Public API Re-exports
// =============================================================================

// Error exports
pub use error::{ErrorCode, SendFailure, SendResult, SenderError};

// Sender exports
pub use sender::{CancelHandle, DataSender, SendHandle, SenderConfig, SenderMetrics};

// Sink exports
pub use sink::{ChannelSink, DataSink, SinkEvent};

// Event pump exports
pub use pump::pump_sink_events;
