//! Widget system: the trait and lifecycle tracking.

pub mod lifecycle;
pub mod traits;

pub use lifecycle::{LifecycleEvent, LifecycleTracker, RenderRequests};
pub use traits::Widget;
