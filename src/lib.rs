//! # refetch-tui
//!
//! A small signal-driven component toolkit and the component pair it exists
//! to run: a `Parent` holding a boolean toggle, and a `Child` that fetches
//! `GET /api/data` and re-fetches only when the value it receives changes.
//!
//! The child's fetch is a dependency-gated effect ([`reactive::DepsEffect`]):
//! it runs on mount, then again on a render only when the dependency list
//! differs from the snapshot taken at its previous run. Re-rendering with an
//! unchanged value never fetches.
//!
//! ## Core Systems
//!
//! - **[`reactive`]**: Signals, tracked effects, dependency-gated effects
//! - **[`dom`]**: Slotmap-backed component tree
//! - **[`widget`]**: Widget trait, lifecycle tracking, render requests
//! - **[`widgets`]**: Static, Button, Parent, Child
//! - **[`event`]**: Input events, messages, key bindings, dispatch
//! - **[`fetch`]**: The `Fetcher` trait, HTTP fetcher, fetch errors
//! - **[`render`]**: Text frames
//! - **[`app`]**: Application struct tying everything together
//! - **[`testing`]**: Headless pilot, scripted fetcher, snapshot helpers

// Core systems
pub mod dom;
pub mod reactive;

// Widget system
pub mod widget;
pub mod widgets;

// Events and I/O
pub mod event;
pub mod fetch;

// Rendering
pub mod render;

// Application
pub mod app;
pub mod testing;
