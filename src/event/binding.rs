//! Key binding registry and resolution.
//!
//! [`KeyBindingRegistry`] maps key+modifier combinations to [`BindingAction`]s.
//! `with_defaults()` installs the standard bindings.

use std::collections::HashMap;

use super::input::{Key, KeyEvent, Modifiers};
use super::message::Message;

// ---------------------------------------------------------------------------
// BindingAction
// ---------------------------------------------------------------------------

/// Action to take when a key binding matches.
pub enum BindingAction {
    Quit,
    /// Flip the parent's state.
    Toggle,
    /// Re-render without changing state.
    Refresh,
    /// Produce a message via a factory function.
    Message(fn() -> Box<dyn Message>),
}

impl std::fmt::Debug for BindingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quit => write!(f, "Quit"),
            Self::Toggle => write!(f, "Toggle"),
            Self::Refresh => write!(f, "Refresh"),
            Self::Message(_) => write!(f, "Message(<fn>)"),
        }
    }
}

// ---------------------------------------------------------------------------
// KeyBindingRegistry
// ---------------------------------------------------------------------------

/// Registry of key bindings, mapping (Key, Modifiers) -> BindingAction.
#[derive(Debug, Default)]
pub struct KeyBindingRegistry {
    bindings: HashMap<(Key, Modifiers), BindingAction>,
}

impl KeyBindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the standard bindings:
    ///
    /// - `Ctrl+C`, `q` -> Quit
    /// - `t`, `Enter` -> Toggle
    /// - `r` -> Refresh
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.bind(Key::Char('c'), Modifiers::CTRL, BindingAction::Quit);
        registry.bind(Key::Char('q'), Modifiers::NONE, BindingAction::Quit);
        registry.bind(Key::Char('t'), Modifiers::NONE, BindingAction::Toggle);
        registry.bind(Key::Enter, Modifiers::NONE, BindingAction::Toggle);
        registry.bind(Key::Char('r'), Modifiers::NONE, BindingAction::Refresh);
        registry
    }

    /// Register a binding, replacing any existing one for the same keys.
    pub fn bind(&mut self, key: Key, modifiers: Modifiers, action: BindingAction) {
        self.bindings.insert((key, modifiers), action);
    }

    /// Remove a binding, returning its action.
    pub fn unbind(&mut self, key: Key, modifiers: Modifiers) -> Option<BindingAction> {
        self.bindings.remove(&(key, modifiers))
    }

    /// Exact-match lookup of key + modifiers.
    pub fn resolve(&self, event: &KeyEvent) -> Option<&BindingAction> {
        self.bindings.get(&(event.code, event.modifiers))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::message::Refresh;

    #[test]
    fn new_registry_is_empty() {
        let reg = KeyBindingRegistry::new();
        assert!(reg.is_empty());
    }

    #[test]
    fn defaults_cover_quit_toggle_refresh() {
        let reg = KeyBindingRegistry::with_defaults();
        assert_eq!(reg.len(), 5);
        let ctrl_c = KeyEvent::new(Key::Char('c'), Modifiers::CTRL);
        assert!(matches!(reg.resolve(&ctrl_c), Some(BindingAction::Quit)));
        let t = KeyEvent::plain(Key::Char('t'));
        assert!(matches!(reg.resolve(&t), Some(BindingAction::Toggle)));
        let enter = KeyEvent::plain(Key::Enter);
        assert!(matches!(reg.resolve(&enter), Some(BindingAction::Toggle)));
        let r = KeyEvent::plain(Key::Char('r'));
        assert!(matches!(reg.resolve(&r), Some(BindingAction::Refresh)));
    }

    #[test]
    fn modifiers_must_match_exactly() {
        let reg = KeyBindingRegistry::with_defaults();
        let plain_c = KeyEvent::plain(Key::Char('c'));
        assert!(reg.resolve(&plain_c).is_none());
        let ctrl_t = KeyEvent::new(Key::Char('t'), Modifiers::CTRL);
        assert!(reg.resolve(&ctrl_t).is_none());
    }

    #[test]
    fn bind_replaces_and_unbind_removes() {
        let mut reg = KeyBindingRegistry::with_defaults();
        reg.bind(Key::Char('t'), Modifiers::NONE, BindingAction::Refresh);
        let t = KeyEvent::plain(Key::Char('t'));
        assert!(matches!(reg.resolve(&t), Some(BindingAction::Refresh)));
        assert!(reg.unbind(Key::Char('t'), Modifiers::NONE).is_some());
        assert!(reg.resolve(&t).is_none());
        assert!(reg.unbind(Key::Char('t'), Modifiers::NONE).is_none());
    }

    #[test]
    fn message_factory_binding() {
        let mut reg = KeyBindingRegistry::new();
        reg.bind(
            Key::Escape,
            Modifiers::NONE,
            BindingAction::Message(|| Box::new(Refresh) as Box<dyn Message>),
        );
        let Some(BindingAction::Message(factory)) = reg.resolve(&KeyEvent::plain(Key::Escape))
        else {
            panic!("expected message binding");
        };
        assert_eq!(factory().message_name(), "Refresh");
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", BindingAction::Toggle), "Toggle");
        assert_eq!(
            format!("{:?}", BindingAction::Message(|| Box::new(Refresh) as Box<dyn Message>)),
            "Message(<fn>)"
        );
    }
}
