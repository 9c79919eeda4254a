//! Component arena: slotmap-backed tree of mounted components.

pub mod node;
pub mod tree;

pub use node::{ComponentId, ComponentNode};
pub use tree::ComponentTree;
