//! Flow-controlled sending with acknowledgment-based completion.
//!
//! This module provides the [`DataSender`] abstraction: ordered,
//! backpressured delivery of byte payloads to a [`DataSink`] with
//! per-send completion reporting.
//!
//! [`DataSink`]: crate::DataSink
//!
//! # Overview
//!
//! A sender owns one sink and drives every payload through the same path:
//! - **Ordered queuing**: payloads transmit strictly in arrival order
//! - **Flow control**: at most `buffer_size` unacknowledged bytes in flight
//! - **Exactly-once completion**: every accepted send resolves, even on
//!   shutdown or when the sender itself is dropped
//!
//! # Send Lifecycle
//!
//! ```text
//! ┌─────────┐  fully pushed   ┌──────────────┐  fully acked   ┌─────────┐
//! │ pending ├────────────────►│ awaiting_ack ├───────────────►│ Ok(len) │
//! └────┬────┘                 └──────┬───────┘                └─────────┘
//!      │ cancel(code)                │ sink error /
//!      │ fails these now             │ connection lost
//!      ▼                             ▼
//! ┌──────────────────────────────────────────────┐
//! │    Err(SendFailure { bytes_acked, code })    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Cancellation fails the not-yet-pushed sends immediately but lets
//! bytes already handed to the sink drain; the [`CancelHandle`] resolves
//! once the last in-flight send has.
//!
//! # Configuration
//!
//! ```ignore
//! use sluice::{ErrorCode, SenderConfig};
//!
//! let config = SenderConfig::default()
//!     .with_buffer_size(16 * 1024)
//!     .with_fatal_error(ErrorCode::new(-2));
//! ```

/// Core sender implementation driving the send lifecycle
pub mod core;

/// Configuration for sender behavior
pub mod config;

/// Counters and gauges describing sender activity
pub mod metrics;

mod flow;
mod pending;
mod queue;

// Re-export main types
pub use config::SenderConfig;
pub use core::DataSender;
pub use metrics::SenderMetrics;
pub use pending::{CancelHandle, SendHandle};
