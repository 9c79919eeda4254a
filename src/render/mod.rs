//! Rendering: the text frame widgets draw into.

pub mod frame;

pub use frame::Frame;
