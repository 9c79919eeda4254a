//! Reactive state: signals, tracked effects, dependency-gated effects.
//!
//! - [`create_signal`]: create a read/write signal pair, freed with [`dispose_signal`].
//! - [`create_effect`]: auto-tracking side effect, disposed with [`dispose_effect`].
//! - [`DepsEffect`]: runs only when an explicit dependency list changes.

pub mod deps;
pub mod signal;

pub use deps::DepsEffect;
pub use signal::{
    create_effect, create_signal, dispose_effect, dispose_signal, is_effect_live, EffectId,
    ReadSignal, SignalId, WriteSignal,
};
