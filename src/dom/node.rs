//! Node types: ComponentId, ComponentNode.

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a mounted component. Copy, lightweight (u64).
    pub struct ComponentId;
}

/// Data recorded for a single mounted component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentNode {
    /// Widget type name (e.g. "Parent", "Button").
    pub widget_type: String,
    /// Whether this component accepts clicks and key focus.
    pub focusable: bool,
}

impl ComponentNode {
    /// Create a non-focusable node for the given widget type.
    pub fn new(widget_type: impl Into<String>) -> Self {
        Self {
            widget_type: widget_type.into(),
            focusable: false,
        }
    }

    /// Set whether this node can receive focus (builder).
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_not_focusable() {
        let node = ComponentNode::new("Child");
        assert_eq!(node.widget_type, "Child");
        assert!(!node.focusable);
    }

    #[test]
    fn focusable_builder() {
        let node = ComponentNode::new("Button").focusable(true);
        assert!(node.focusable);
    }
}
