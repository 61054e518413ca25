//! One-way delivery of classified states to the menu layer.

use crate::proto as pb;
use crate::state::PopupState;
use crate::wire::write_envelope;
use std::io::Write;
use std::sync::mpsc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const CONTEXT_MENU_MESSAGE: &str = "Content:ContextMenu";

/// Fire-and-forget channel to the host. Delivery failures are the sink's
/// problem; callers never hear about them.
pub trait MessageSink {
    fn send_async_message(&mut self, name: &str, state: &PopupState);
}

/// In-process queue, handy when host and content share a process.
pub struct QueueSink {
    sender: mpsc::Sender<(String, PopupState)>,
}

impl QueueSink {
    pub fn channel() -> (Self, mpsc::Receiver<(String, PopupState)>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl MessageSink for QueueSink {
    fn send_async_message(&mut self, name: &str, state: &PopupState) {
        if self.sender.send((name.to_string(), state.clone())).is_err() {
            log::debug!("{name} dropped, receiver gone");
        }
    }
}

/// Writes each message as a framed `Event` envelope.
pub struct FramedSink<W: Write> {
    writer: W,
    session_id: String,
}

impl<W: Write> FramedSink<W> {
    pub fn new(writer: W, session_id: impl Into<String>) -> Self {
        Self {
            writer,
            session_id: session_id.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MessageSink for FramedSink<W> {
    fn send_async_message(&mut self, name: &str, state: &PopupState) {
        let envelope = pb::Envelope {
            message: Some(pb::envelope::Message::Event(pb::Event {
                name: name.to_string(),
                session_id: self.session_id.clone(),
                state: Some(state.to_message()),
                timestamp: Some(timestamp_now()),
            })),
        };
        if let Err(err) = write_envelope(&mut self.writer, &envelope) {
            log::warn!("failed to deliver {name}: {err}");
        }
    }
}

fn timestamp_now() -> prost_types::Timestamp {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0));
    prost_types::Timestamp {
        seconds: now.as_secs() as i64,
        nanos: now.subsec_nanos() as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::read_envelope;
    use std::io::Cursor;

    #[test]
    fn framed_sink_writes_event_envelopes() {
        let mut state = PopupState::default();
        state.push_type("content-text");
        state.x_pos = 4.0;

        let mut sink = FramedSink::new(Vec::new(), "tab-1");
        sink.send_async_message(CONTEXT_MENU_MESSAGE, &state);

        let mut cursor = Cursor::new(sink.into_inner());
        let envelope = read_envelope(&mut cursor).unwrap().unwrap();
        let Some(pb::envelope::Message::Event(event)) = envelope.message else {
            panic!("expected event envelope");
        };
        assert_eq!(event.name, "Content:ContextMenu");
        assert_eq!(event.session_id, "tab-1");
        assert_eq!(event.state, Some(state.to_message()));
        assert!(event.timestamp.is_some());
    }

    #[test]
    fn queue_sink_survives_dropped_receiver() {
        let (mut sink, receiver) = QueueSink::channel();
        sink.send_async_message(CONTEXT_MENU_MESSAGE, &PopupState::default());
        assert_eq!(receiver.recv().unwrap().0, CONTEXT_MENU_MESSAGE);

        drop(receiver);
        sink.send_async_message(CONTEXT_MENU_MESSAGE, &PopupState::default());
    }
}
