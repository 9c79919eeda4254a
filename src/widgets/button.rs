//! Button widget: an interactive, focusable button.
//!
//! Renders its label in brackets on a single row. A button always takes
//! focus, so clicks can land on it.

use std::any::Any;

use crate::render::Frame;
use crate::widget::Widget;

/// An interactive button with a text label.
///
/// # Examples
///
/// ```ignore
/// let btn = Button::new("Trigger Re-render");
/// ```
#[derive(Debug, Clone)]
pub struct Button {
    label: String,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Widget for Button {
    fn widget_type(&self) -> &str {
        "Button"
    }

    fn can_focus(&self) -> bool {
        true
    }

    fn render(&self, frame: &mut Frame) {
        frame.push_row(&format!("[ {} ]", self.label));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
