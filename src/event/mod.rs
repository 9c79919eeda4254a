//! Event system: input events, messages, key bindings, dispatch.

pub mod binding;
pub mod handler;
pub mod input;
pub mod message;

pub use binding::{BindingAction, KeyBindingRegistry};
pub use handler::{EventDispatcher, MessageSender};
pub use input::{InputEvent, Key, KeyEvent, Modifiers};
pub use message::{Envelope, FetchCompleted, Message, Quit, Refresh, Toggle};
