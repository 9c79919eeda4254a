//! Widget lifecycle: mount, unmount, render requests.
//!
//! The [`LifecycleTracker`] records which components are mounted and queues
//! `Mount`/`Unmount`/`Update` events for the app loop. [`RenderRequests`] is
//! the shared handle state-change effects use to ask for a re-render; the app
//! drains it into `Update` events at the start of each pass.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::dom::ComponentId;

// ---------------------------------------------------------------------------
// LifecycleEvent
// ---------------------------------------------------------------------------

/// Events that occur during a component's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Mount { id: ComponentId },
    Unmount { id: ComponentId },
    /// State changed; the component must be rendered again.
    Update { id: ComponentId },
}

// ---------------------------------------------------------------------------
// LifecycleTracker
// ---------------------------------------------------------------------------

/// Tracks mounted components and accumulates lifecycle events.
#[derive(Debug, Default)]
pub struct LifecycleTracker {
    mounted: HashSet<ComponentId>,
    pending: Vec<LifecycleEvent>,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mount. Mounting twice produces one event.
    pub fn on_mount(&mut self, id: ComponentId) {
        if self.mounted.insert(id) {
            self.pending.push(LifecycleEvent::Mount { id });
        }
    }

    /// Record an unmount. Unmounting something not mounted is a no-op.
    pub fn on_unmount(&mut self, id: ComponentId) {
        if self.mounted.remove(&id) {
            self.pending.push(LifecycleEvent::Unmount { id });
        }
    }

    /// Record that a mounted component needs re-rendering.
    ///
    /// Requests for components that are not mounted are ignored.
    pub fn on_update(&mut self, id: ComponentId) {
        if self.mounted.contains(&id) {
            self.pending.push(LifecycleEvent::Update { id });
        }
    }

    pub fn is_mounted(&self, id: ComponentId) -> bool {
        self.mounted.contains(&id)
    }

    pub fn mounted_count(&self) -> usize {
        self.mounted.len()
    }

    /// Drain pending events in order of occurrence.
    pub fn pending_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RenderRequests
// ---------------------------------------------------------------------------

/// Shared queue of components whose state changed since the last render.
///
/// Cloning yields another handle to the same queue, so a handle can be moved
/// into a signal effect while the app keeps its own.
#[derive(Debug, Clone, Default)]
pub struct RenderRequests {
    queue: Rc<RefCell<Vec<ComponentId>>>,
}

impl RenderRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for `id` to be rendered on the next pass.
    pub fn request(&self, id: ComponentId) {
        let mut queue = self.queue.borrow_mut();
        if !queue.contains(&id) {
            queue.push(id);
        }
    }

    /// Take all outstanding requests, oldest first.
    pub fn take(&self) -> Vec<ComponentId> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
