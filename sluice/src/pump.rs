//! Event pump marshaling sink feedback onto the sender's control flow.
//!
//! A [`DataSender`] is single-flow: sends, cancels, and sink events all
//! mutate the same state with no internal locking. When acknowledgments
//! are produced elsewhere (an I/O task, a wire reader), run
//! [`pump_sink_events`] on the sender's task and feed it through an
//! unbounded channel.

use std::cell::RefCell;
use std::rc::Rc;

use tokio::sync::mpsc;

use crate::sender::DataSender;
use crate::sink::{DataSink, SinkEvent};

/// Apply every event from `events` to `sender`, in arrival order.
///
/// Returns when the channel closes or the sender shuts down, whichever
/// comes first. The shared handle is borrowed only for the duration of
/// each event, so callers on the same task can keep sending in between.
pub async fn pump_sink_events<S: DataSink>(
    sender: Rc<RefCell<DataSender<S>>>,
    mut events: mpsc::UnboundedReceiver<SinkEvent>,
) {
    while let Some(event) = events.recv().await {
        let mut sender = sender.borrow_mut();
        tracing::trace!(?event, "applying sink event");
        sender.handle_event(event);
        if sender.is_shut_down() {
            tracing::debug!("sender shut down, stopping event pump");
            return;
        }
    }
    tracing::debug!("event channel closed, stopping event pump");
}
