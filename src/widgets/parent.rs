//! Parent component: owns the toggle state and the child.
//!
//! The parent holds a boolean signal, initially `false`, and renders a
//! [`Button`] followed by its [`Child`]. Every render passes the current state
//! down as the child's `parent_state` prop. Flipping the state requests a
//! parent render through the shared [`RenderRequests`] queue.

use std::any::Any;

use tracing::info;

use crate::dom::{ComponentId, ComponentNode, ComponentTree};
use crate::reactive::{
    create_effect, create_signal, dispose_effect, dispose_signal, EffectId, ReadSignal,
    WriteSignal,
};
use crate::render::Frame;
use crate::widget::{RenderRequests, Widget};
use crate::widgets::child::{Child, ChildProps};
use crate::widgets::Button;

/// Label of the toggle button.
pub const BUTTON_LABEL: &str = "Trigger Re-render";

/// The stateful parent component.
#[derive(Debug)]
pub struct Parent {
    id: ComponentId,
    button_id: ComponentId,
    button: Button,
    state: ReadSignal<bool>,
    set_state: WriteSignal<bool>,
    watcher: EffectId,
    child: Child,
}

impl Parent {
    /// Insert the parent, its button and its child into `tree` and create
    /// their state.
    ///
    /// The parent becomes the tree root when the tree is empty.
    pub fn mount(
        tree: &mut ComponentTree,
        requests: &RenderRequests,
        retain_stale_data: bool,
    ) -> Self {
        let id = tree.insert(ComponentNode::new("Parent"));
        let button = Button::new(BUTTON_LABEL);
        let button_id = tree.insert_child(
            id,
            ComponentNode::new(button.widget_type()).focusable(button.can_focus()),
        );
        let child_id = tree.insert_child(id, ComponentNode::new("Child"));

        let (state, set_state) = create_signal(false);
        let watch_requests = requests.clone();
        let watcher = create_effect(move || {
            state.with(|_| ());
            watch_requests.request(id);
        });

        let child = Child::mount(
            child_id,
            ChildProps { parent_state: false },
            requests.clone(),
            retain_stale_data,
        );

        Self {
            id,
            button_id,
            button,
            state,
            set_state,
            watcher,
            child,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn button_id(&self) -> ComponentId {
        self.button_id
    }

    pub fn button(&self) -> &Button {
        &self.button
    }

    pub fn child(&self) -> &Child {
        &self.child
    }

    pub fn child_mut(&mut self) -> &mut Child {
        &mut self.child
    }

    /// Current state value.
    pub fn state(&self) -> bool {
        self.state.get_untracked()
    }

    /// Flip the state. Always changes the value, so always schedules a render.
    ///
    /// A no-op once unmounted.
    pub fn toggle(&self) {
        let mut now = None;
        self.set_state.update(|value| {
            *value = !*value;
            now = Some(*value);
        });
        if let Some(state) = now {
            info!(state, "parent state toggled");
        }
    }

    /// Recompute the child's props from the current state.
    ///
    /// Called once per parent render, before the child's effects run.
    pub fn reconcile(&mut self) {
        self.child.set_props(ChildProps {
            parent_state: self.state.get_untracked(),
        });
    }

    /// Tear down state subscriptions, free the state, and remove the subtree
    /// from `tree`.
    ///
    /// Returns the removed ids, parent first.
    pub fn unmount(&mut self, tree: &mut ComponentTree) -> Vec<ComponentId> {
        self.child.unmount();
        dispose_effect(self.watcher);
        dispose_signal(self.state);
        tree.remove(self.id)
    }
}

impl Widget for Parent {
    fn widget_type(&self) -> &str {
        "Parent"
    }

    fn render(&self, frame: &mut Frame) {
        self.button.render(frame);
        self.child.render(frame);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
