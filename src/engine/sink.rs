use log::trace;
use tokio::sync::{broadcast, mpsc};

use crate::game::Event;

/// Receives the notifications an engine produces.
pub trait EventSink: Send + 'static {
    fn notify(&mut self, event: Event);
}

impl EventSink for mpsc::UnboundedSender<Event> {
    fn notify(&mut self, event: Event) {
        if self.send(event).is_err() {
            trace!("event receiver is gone");
        }
    }
}

impl EventSink for broadcast::Sender<Event> {
    fn notify(&mut self, event: Event) {
        // no subscribers is fine
        let _ = self.send(event);
    }
}
