//! Shared fixtures for sender integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sluice::{DataSender, DataSink, ErrorCode, SenderConfig};

/// Create a single-threaded tokio runtime for tests.
pub fn local_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build test runtime")
}

/// Install a tracing subscriber honoring `RUST_LOG`, once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Sink double recording every pushed chunk.
///
/// The probe half stays with the test body to inspect what reached the
/// sink and to flip the sink into refusing further pushes.
pub struct RecordingSink {
    pushed: Rc<RefCell<Vec<Vec<u8>>>>,
    accept: Rc<Cell<bool>>,
}

impl RecordingSink {
    /// Create a sink and the probe observing it.
    pub fn new() -> (Self, SinkProbe) {
        let pushed = Rc::new(RefCell::new(Vec::new()));
        let accept = Rc::new(Cell::new(true));
        (
            Self {
                pushed: pushed.clone(),
                accept: accept.clone(),
            },
            SinkProbe { pushed, accept },
        )
    }
}

impl DataSink for RecordingSink {
    fn push_data(&mut self, chunk: &[u8]) -> bool {
        if !self.accept.get() {
            return false;
        }
        self.pushed.borrow_mut().push(chunk.to_vec());
        true
    }
}

/// Test-side view of a [`RecordingSink`].
pub struct SinkProbe {
    pushed: Rc<RefCell<Vec<Vec<u8>>>>,
    accept: Rc<Cell<bool>>,
}

impl SinkProbe {
    /// Lengths of the chunks pushed so far, in push order.
    pub fn chunk_lens(&self) -> Vec<usize> {
        self.pushed.borrow().iter().map(Vec::len).collect()
    }

    /// Every pushed byte, concatenated in push order.
    pub fn bytes(&self) -> Vec<u8> {
        self.pushed.borrow().iter().flatten().copied().collect()
    }

    /// Total number of bytes pushed so far.
    pub fn total_bytes(&self) -> usize {
        self.pushed.borrow().iter().map(Vec::len).sum()
    }

    /// Make the sink refuse every further push.
    pub fn refuse_further_pushes(&self) {
        self.accept.set(false);
    }
}

/// Sender over a [`RecordingSink`] with the given buffer size and a
/// fatal error code of `-1`.
pub fn sender_with_buffer(buffer_size: usize) -> (DataSender<RecordingSink>, SinkProbe) {
    let (sink, probe) = RecordingSink::new();
    let sender = DataSender::new(sink, SenderConfig::new(buffer_size, ErrorCode::new(-1)));
    (sender, probe)
}
