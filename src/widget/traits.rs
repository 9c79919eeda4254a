//! Widget trait: type name, render, focus.
//!
//! Every component in the tree implements [`Widget`]. Rendering is a pure
//! function of the widget's current state: it appends rows to a [`Frame`]
//! and never mutates the widget. State changes go through signals and are
//! picked up by the next render pass.

use std::any::Any;

use crate::render::Frame;

/// Core trait implemented by all widgets.
///
/// Object-safe: the app can hold and render `&dyn Widget`.
pub trait Widget {
    /// The type name of this widget (e.g. "Button", "Child").
    fn widget_type(&self) -> &str;

    /// Append this widget's rows to `frame`.
    fn render(&self, frame: &mut Frame);

    /// Whether this widget accepts clicks and key focus. Defaults to `false`.
    fn can_focus(&self) -> bool {
        false
    }

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Label(&'static str);

    impl Widget for Label {
        fn widget_type(&self) -> &str {
            "Label"
        }

        fn render(&self, frame: &mut Frame) {
            frame.push_row(self.0);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Focusable;

    impl Widget for Focusable {
        fn widget_type(&self) -> &str {
            "Focusable"
        }

        fn render(&self, _frame: &mut Frame) {}

        fn can_focus(&self) -> bool {
            true
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn render_appends_rows() {
        let mut frame = Frame::new(10);
        Label("hi").render(&mut frame);
        assert_eq!(frame.to_text(), "hi");
    }

    #[test]
    fn can_focus_defaults_false() {
        assert!(!Label("x").can_focus());
        assert!(Focusable.can_focus());
    }

    #[test]
    fn widget_is_object_safe() {
        let widgets: Vec<Box<dyn Widget>> = vec![Box::new(Label("a")), Box::new(Focusable)];
        let mut frame = Frame::new(10);
        for w in &widgets {
            w.render(&mut frame);
        }
        assert_eq!(frame.height(), 1);
        assert_eq!(widgets[1].widget_type(), "Focusable");
    }

    #[test]
    fn as_any_downcast() {
        let label: Box<dyn Widget> = Box::new(Label("test"));
        let inner = label.as_any().downcast_ref::<Label>().unwrap();
        assert_eq!(inner.0, "test");
    }
}
