//! Built-in widgets: Static, Button, and the Parent/Child component pair.

pub mod button;
pub mod child;
pub mod parent;
pub mod static_widget;

pub use button::Button;
pub use child::{Child, ChildData, ChildProps};
pub use parent::Parent;
pub use static_widget::Static;
