//! Signal<T> and create_signal() for component state.
//!
//! Signals store values; effects auto-track the signals they read and re-run
//! when one of them is written. The runtime is thread-local and synchronous:
//! every write runs its subscribers before returning.
//!
//! Slots live in generational slotmaps. Disposing a signal or an effect frees
//! its slot for reuse, and a stale id never reaches the new occupant.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

use slotmap::{new_key_type, SlotMap};
use tracing::trace;

// ---------------------------------------------------------------------------
// IDs
// ---------------------------------------------------------------------------

new_key_type! {
    /// Identifies a signal slot inside the runtime.
    pub struct SignalId;

    /// Identifies an effect slot inside the runtime.
    pub struct EffectId;
}

// ---------------------------------------------------------------------------
// Runtime internals
// ---------------------------------------------------------------------------

struct SignalSlot {
    value: Box<dyn Any>,
    subscribers: HashSet<EffectId>,
}

struct EffectSlot {
    /// Taken out while the effect runs so no `RefMut` on the runtime is held
    /// across the user callback.
    callback: Option<Box<dyn FnMut()>>,
    sources: HashSet<SignalId>,
}

#[derive(Default)]
struct Runtime {
    signals: SlotMap<SignalId, SignalSlot>,
    effects: SlotMap<EffectId, EffectSlot>,
    /// The effect currently executing, if any.
    observer: Option<EffectId>,
    /// Writes made while effects are being flushed are queued here.
    queued: Vec<EffectId>,
    flushing: bool,
}

impl Runtime {
    fn is_live(&self, eid: EffectId) -> bool {
        self.effects.contains_key(eid)
    }

    fn unsubscribe(&mut self, eid: EffectId, sources: impl IntoIterator<Item = SignalId>) {
        for sid in sources {
            if let Some(signal) = self.signals.get_mut(sid) {
                signal.subscribers.remove(&eid);
            }
        }
    }
}

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::default());
}

// ---------------------------------------------------------------------------
// Signal creation
// ---------------------------------------------------------------------------

/// Create a reactive signal with the given initial value.
///
/// Returns a `(ReadSignal<T>, WriteSignal<T>)` pair. Reading inside an effect
/// subscribes that effect to later writes.
pub fn create_signal<T: 'static>(initial: T) -> (ReadSignal<T>, WriteSignal<T>) {
    let id = RUNTIME.with(|rt| {
        rt.borrow_mut().signals.insert(SignalSlot {
            value: Box::new(initial),
            subscribers: HashSet::new(),
        })
    });

    (
        ReadSignal {
            id,
            _marker: PhantomData,
        },
        WriteSignal {
            id,
            _marker: PhantomData,
        },
    )
}

/// Free a signal's slot. Both halves become dead handles.
///
/// Later writes are ignored; later reads panic. Disposing twice is a no-op.
pub fn dispose_signal<T: 'static>(signal: ReadSignal<T>) {
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let Some(slot) = rt.signals.remove(signal.id) else {
            return;
        };
        for eid in slot.subscribers {
            if let Some(effect) = rt.effects.get_mut(eid) {
                effect.sources.remove(&signal.id);
            }
        }
    });
}

// ---------------------------------------------------------------------------
// ReadSignal
// ---------------------------------------------------------------------------

/// Read-half of a signal. `Copy`, only stores an id.
pub struct ReadSignal<T: 'static> {
    id: SignalId,
    _marker: PhantomData<T>,
}

impl<T: 'static> Copy for ReadSignal<T> {}
impl<T: 'static> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadSignal").field("id", &self.id).finish()
    }
}

impl<T: 'static> ReadSignal<T> {
    /// Read the current value, subscribing the running effect (if any).
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Read by reference. Subscribes the running effect (if any).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        RUNTIME.with(|rt| {
            {
                let mut rt = rt.borrow_mut();
                if let Some(eid) = rt.observer {
                    if let Some(signal) = rt.signals.get_mut(self.id) {
                        signal.subscribers.insert(eid);
                    }
                    if let Some(effect) = rt.effects.get_mut(eid) {
                        effect.sources.insert(self.id);
                    }
                }
            }
            let rt = rt.borrow();
            f(downcast(&live_slot(&rt, self.id).value))
        })
    }

    /// Read without subscribing anything.
    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        RUNTIME.with(|rt| downcast::<T>(&live_slot(&rt.borrow(), self.id).value).clone())
    }

    /// Whether the signal has not been disposed.
    pub fn is_live(&self) -> bool {
        RUNTIME.with(|rt| rt.borrow().signals.contains_key(self.id))
    }
}

fn live_slot(rt: &Runtime, id: SignalId) -> &SignalSlot {
    rt.signals.get(id).expect("signal read after dispose")
}

fn downcast<T: 'static>(value: &Box<dyn Any>) -> &T {
    value.downcast_ref::<T>().expect("signal type mismatch")
}

// ---------------------------------------------------------------------------
// WriteSignal
// ---------------------------------------------------------------------------

/// Write-half of a signal. `Copy`, only stores an id.
pub struct WriteSignal<T: 'static> {
    id: SignalId,
    _marker: PhantomData<T>,
}

impl<T: 'static> Copy for WriteSignal<T> {}
impl<T: 'static> Clone for WriteSignal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> fmt::Debug for WriteSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteSignal").field("id", &self.id).finish()
    }
}

impl<T: 'static> WriteSignal<T> {
    /// Overwrite the value and notify subscribers.
    pub fn set(&self, value: T) {
        self.update(|slot| *slot = value);
    }

    /// Overwrite the value only when it differs, notifying only in that case.
    ///
    /// Returns whether a write happened.
    pub fn set_if_changed(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        let changed = RUNTIME.with(|rt| {
            rt.borrow()
                .signals
                .get(self.id)
                .is_some_and(|slot| downcast::<T>(&slot.value) != &value)
        });
        if changed {
            self.set(value);
        }
        changed
    }

    /// Mutate the value in place and notify subscribers.
    ///
    /// Writes to a disposed signal are dropped.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let subscribers = RUNTIME.with(|rt| {
            let mut rt = rt.borrow_mut();
            let slot = rt.signals.get_mut(self.id)?;
            f(slot
                .value
                .downcast_mut::<T>()
                .expect("signal type mismatch"));
            Some(slot.subscribers.iter().copied().collect::<Vec<_>>())
        });
        match subscribers {
            Some(subscribers) => notify(subscribers),
            None => trace!(id = ?self.id, "write to disposed signal ignored"),
        }
    }
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// Create an effect that auto-tracks signal reads and return its id.
///
/// The closure runs once immediately to establish its subscriptions, then
/// again after every write to a signal it read on its previous run.
pub fn create_effect(f: impl FnMut() + 'static) -> EffectId {
    let eid = RUNTIME.with(|rt| {
        rt.borrow_mut().effects.insert(EffectSlot {
            callback: Some(Box::new(f)),
            sources: HashSet::new(),
        })
    });
    run_effect(eid);
    eid
}

/// Stop an effect and free its slot. It is unsubscribed from every signal
/// and never runs again.
///
/// Disposing twice is a no-op.
pub fn dispose_effect(eid: EffectId) {
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        if let Some(effect) = rt.effects.remove(eid) {
            rt.unsubscribe(eid, effect.sources);
        }
    });
}

/// Whether an effect exists and has not been disposed.
pub fn is_effect_live(eid: EffectId) -> bool {
    RUNTIME.with(|rt| rt.borrow().is_live(eid))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Run one effect: drop its old subscriptions, observe, execute.
fn run_effect(eid: EffectId) {
    let taken = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let effect = rt.effects.get_mut(eid)?;
        // Already running further up the stack; effects are not re-entered.
        let callback = effect.callback.take()?;
        let old: Vec<SignalId> = effect.sources.drain().collect();
        rt.unsubscribe(eid, old);
        let previous = rt.observer.replace(eid);
        Some((callback, previous))
    });

    let Some((mut callback, previous)) = taken else {
        return;
    };

    callback();

    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        rt.observer = previous;
        // The callback may have disposed its own effect.
        if let Some(effect) = rt.effects.get_mut(eid) {
            effect.callback = Some(callback);
        }
    });
}

/// Run the subscribers of a written signal, then anything they queued.
fn notify(subscribers: Vec<EffectId>) {
    if subscribers.is_empty() {
        return;
    }

    let nested = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        if rt.flushing {
            rt.queued.extend(subscribers.iter().copied());
            true
        } else {
            rt.flushing = true;
            false
        }
    });
    if nested {
        return;
    }

    let mut queue = subscribers;
    while !queue.is_empty() {
        let mut seen = HashSet::new();
        for eid in queue.drain(..).filter(|eid| seen.insert(*eid)) {
            run_effect(eid);
        }
        RUNTIME.with(|rt| queue.append(&mut rt.borrow_mut().queued));
    }

    RUNTIME.with(|rt| rt.borrow_mut().flushing = false);
}

#[cfg(test)]
pub(crate) fn reset_runtime() {
    RUNTIME.with(|rt| *rt.borrow_mut() = Runtime::default());
}

/// Occupied `(signal, effect)` slots on this thread.
#[cfg(test)]
pub(crate) fn live_slots() -> (usize, usize) {
    RUNTIME.with(|rt| {
        let rt = rt.borrow();
        (rt.signals.len(), rt.effects.len())
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
