//! Message trait, envelope, and built-in messages.
//!
//! The [`Message`] trait is object-safe and supports downcasting via `Any`.
//! [`Envelope`] wraps a boxed message with routing metadata (sender, target).
//! Built-in messages: [`Quit`], [`Refresh`], [`Toggle`], [`FetchCompleted`].

use std::any::Any;

use serde_json::Value;

use crate::dom::ComponentId;
use crate::fetch::{FetchError, FetchTicket};

// ---------------------------------------------------------------------------
// Message trait
// ---------------------------------------------------------------------------

/// Object-safe message trait.
///
/// Messages are `Send` so background fetch tasks can post them back to the
/// app thread.
pub trait Message: Send + 'static {
    /// Upcast to `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Upcast an owned message so its payload can be moved out.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Human-readable name for this message type.
    fn message_name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Wraps a boxed message with routing metadata.
pub struct Envelope {
    pub message: Box<dyn Message>,
    /// The component that sent this message.
    pub sender: ComponentId,
    /// If `Some`, the message is addressed to a specific component.
    pub target: Option<ComponentId>,
}

impl Envelope {
    /// Create an untargeted envelope.
    pub fn new(message: impl Message, sender: ComponentId) -> Self {
        Self {
            message: Box::new(message),
            sender,
            target: None,
        }
    }

    /// Create an envelope addressed to `target`.
    pub fn targeted(message: impl Message, sender: ComponentId, target: ComponentId) -> Self {
        Self {
            message: Box::new(message),
            sender,
            target: Some(target),
        }
    }

    /// Whether the payload is a `T`.
    pub fn is<T: Message>(&self) -> bool {
        self.message.as_any().is::<T>()
    }

    /// Borrow the payload as a `T`.
    pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
        self.message.as_any().downcast_ref::<T>()
    }

    /// Consume the envelope and move the payload out as a `T`.
    ///
    /// Returns `None` (dropping the message) if the payload is another type;
    /// check with [`is`](Self::is) first when that matters.
    pub fn take<T: Message>(self) -> Option<T> {
        self.message.into_any().downcast::<T>().ok().map(|boxed| *boxed)
    }
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("message_name", &self.message.message_name())
            .field("sender", &self.sender)
            .field("target", &self.target)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Built-in messages
// ---------------------------------------------------------------------------

/// Request application shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quit;

impl Message for Quit {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
    fn message_name(&self) -> &str {
        "Quit"
    }
}

/// Re-render the root component without changing any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refresh;

impl Message for Refresh {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
    fn message_name(&self) -> &str {
        "Refresh"
    }
}

/// Flip the parent's state flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle;

impl Message for Toggle {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
    fn message_name(&self) -> &str {
        "Toggle"
    }
}

/// Outcome of one effect execution's fetch, posted from the fetch task.
#[derive(Debug)]
pub struct FetchCompleted {
    pub ticket: FetchTicket,
    pub result: Result<Value, FetchError>,
}

impl Message for FetchCompleted {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
    fn message_name(&self) -> &str {
        "FetchCompleted"
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use slotmap::SlotMap;

    fn make_id(sm: &mut SlotMap<ComponentId, ()>) -> ComponentId {
        sm.insert(())
    }

    #[test]
    fn builtin_message_names() {
        assert_eq!(Quit.message_name(), "Quit");
        assert_eq!(Refresh.message_name(), "Refresh");
        assert_eq!(Toggle.message_name(), "Toggle");
        let done = FetchCompleted {
            ticket: FetchTicket(1),
            result: Ok(json!(null)),
        };
        assert_eq!(done.message_name(), "FetchCompleted");
    }

    #[test]
    fn envelope_new_is_untargeted() {
        let mut sm = SlotMap::with_key();
        let sender = make_id(&mut sm);
        let env = Envelope::new(Toggle, sender);
        assert_eq!(env.sender, sender);
        assert!(env.target.is_none());
    }

    #[test]
    fn envelope_targeted() {
        let mut sm = SlotMap::with_key();
        let sender = make_id(&mut sm);
        let target = make_id(&mut sm);
        let env = Envelope::targeted(Toggle, sender, target);
        assert_eq!(env.target, Some(target));
    }

    #[test]
    fn envelope_downcast_ref() {
        let mut sm = SlotMap::with_key();
        let sender = make_id(&mut sm);
        let env = Envelope::new(Quit, sender);
        assert!(env.is::<Quit>());
        assert!(env.downcast_ref::<Quit>().is_some());
        assert!(env.downcast_ref::<Toggle>().is_none());
    }

    #[test]
    fn envelope_take_moves_payload() {
        let mut sm = SlotMap::with_key();
        let sender = make_id(&mut sm);
        let env = Envelope::new(
            FetchCompleted {
                ticket: FetchTicket(3),
                result: Ok(json!({"a": 1})),
            },
            sender,
        );
        let done = env.take::<FetchCompleted>().unwrap();
        assert_eq!(done.ticket, FetchTicket(3));
        assert_eq!(done.result.unwrap(), json!({"a": 1}));
    }

    #[test]
    fn envelope_take_wrong_type() {
        let mut sm = SlotMap::with_key();
        let sender = make_id(&mut sm);
        let env = Envelope::new(Quit, sender);
        assert!(env.take::<Toggle>().is_none());
    }

    #[test]
    fn envelope_debug_names_message() {
        let mut sm = SlotMap::with_key();
        let sender = make_id(&mut sm);
        let dbg = format!("{:?}", Envelope::new(Refresh, sender));
        assert!(dbg.contains("Envelope"));
        assert!(dbg.contains("Refresh"));
    }
}
