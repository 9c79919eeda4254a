//! Headless testing framework: Pilot, scripted fetcher, snapshot helpers.
//!
//! Use the [`Pilot`] to drive an [`App`](crate::app::App) without a terminal
//! or a server. [`ScriptedFetcher`] decides what each fetch returns and when.
//! [`render_to_string`] captures widget output as plain text.

pub mod fetcher;
pub mod pilot;
pub mod snapshot;

pub use fetcher::{Responder, ScriptedFetcher};
pub use pilot::Pilot;
pub use snapshot::{render_frame, render_to_string};
