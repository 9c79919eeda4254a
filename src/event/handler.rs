//! Event dispatch: the app's single update queue.
//!
//! [`EventDispatcher`] holds messages produced on the app thread (input,
//! bindings) in a local queue, and receives messages from background tasks
//! (fetch completions) over an unbounded tokio channel. Both feed one ordered
//! stream that the app loop drains between render passes.

use std::collections::VecDeque;

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

use super::message::Envelope;

// ---------------------------------------------------------------------------
// MessageSender
// ---------------------------------------------------------------------------

/// Cloneable, `Send` handle for posting messages from other tasks.
#[derive(Debug, Clone)]
pub struct MessageSender {
    tx: UnboundedSender<Envelope>,
}

impl MessageSender {
    /// Post an envelope. Returns `false` if the dispatcher is gone.
    pub fn post(&self, envelope: Envelope) -> bool {
        self.tx.send(envelope).is_ok()
    }
}

// ---------------------------------------------------------------------------
// EventDispatcher
// ---------------------------------------------------------------------------

/// Queue-based event dispatcher.
///
/// The dispatcher does not route messages; the app loop decides what each
/// one means.
#[derive(Debug)]
pub struct EventDispatcher {
    queue: VecDeque<Envelope>,
    tx: UnboundedSender<Envelope>,
    rx: UnboundedReceiver<Envelope>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            queue: VecDeque::new(),
            tx,
            rx,
        }
    }

    /// A handle background tasks use to post back to this dispatcher.
    pub fn sender(&self) -> MessageSender {
        MessageSender {
            tx: self.tx.clone(),
        }
    }

    /// Enqueue a message produced on the app thread.
    pub fn push(&mut self, envelope: Envelope) {
        self.queue.push_back(envelope);
    }

    /// Move everything already delivered on the channel into the local queue.
    fn pull_posted(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(envelope) => self.queue.push_back(envelope),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Drain all pending messages, local and posted, in arrival order.
    pub fn drain(&mut self) -> Vec<Envelope> {
        self.pull_posted();
        self.queue.drain(..).collect()
    }

    /// Wait until at least one message is pending.
    ///
    /// Returns immediately if the local queue is non-empty.
    pub async fn wait(&mut self) {
        if !self.queue.is_empty() {
            return;
        }
        // The dispatcher holds a sender itself, so the channel never closes.
        if let Some(envelope) = self.rx.recv().await {
            self.queue.push_back(envelope);
        }
    }

    /// Number of messages in the local queue. Posted messages are counted
    /// once they have been pulled by `drain` or `wait`.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ComponentId;
    use crate::event::message::{Quit, Refresh, Toggle};
    use slotmap::SlotMap;

    fn sender_id() -> ComponentId {
        let mut sm: SlotMap<ComponentId, ()> = SlotMap::with_key();
        sm.insert(())
    }

    #[test]
    fn new_dispatcher_is_empty() {
        let disp = EventDispatcher::new();
        assert!(disp.is_empty());
        assert_eq!(disp.pending_count(), 0);
    }

    #[test]
    fn push_and_drain() {
        let id = sender_id();
        let mut disp = EventDispatcher::new();
        disp.push(Envelope::new(Quit, id));
        disp.push(Envelope::new(Refresh, id));
        assert_eq!(disp.pending_count(), 2);

        let messages = disp.drain();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is::<Quit>());
        assert!(messages[1].is::<Refresh>());
        assert!(disp.is_empty());
    }

    #[test]
    fn drain_includes_posted_messages_after_local() {
        let id = sender_id();
        let mut disp = EventDispatcher::new();
        disp.push(Envelope::new(Quit, id));
        assert!(disp.sender().post(Envelope::new(Toggle, id)));

        let messages = disp.drain();
        assert_eq!(messages.len(), 2);
        assert!(messages[1].is::<Toggle>());
    }

    #[test]
    fn post_after_drop_fails() {
        let sender = EventDispatcher::new().sender();
        assert!(!sender.post(Envelope::new(Quit, sender_id())));
    }

    #[tokio::test]
    async fn wait_receives_from_task() {
        let id = sender_id();
        let mut disp = EventDispatcher::new();
        let sender = disp.sender();
        tokio::spawn(async move {
            sender.post(Envelope::new(Toggle, id));
        });
        disp.wait().await;
        assert_eq!(disp.pending_count(), 1);
        assert!(disp.drain()[0].is::<Toggle>());
    }

    #[tokio::test]
    async fn wait_returns_immediately_when_queued() {
        let id = sender_id();
        let mut disp = EventDispatcher::new();
        disp.push(Envelope::new(Quit, id));
        disp.wait().await;
        assert_eq!(disp.pending_count(), 1);
    }
}
