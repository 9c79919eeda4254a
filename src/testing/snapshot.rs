//! Snapshot rendering helpers.
//!
//! Render a widget into a fresh [`Frame`] and return its text, ready for
//! `assert_eq!` or `insta` inline snapshots.

use crate::render::Frame;
use crate::widget::Widget;

/// Render a widget to plain text at the given width.
///
/// Each row becomes one line with trailing spaces trimmed. Lines are
/// separated by `'\n'` with no trailing newline.
///
/// # Examples
///
/// ```ignore
/// use refetch_tui::testing::render_to_string;
/// use refetch_tui::widgets::Static;
///
/// let output = render_to_string(&Static::new("Hello"), 20);
/// assert_eq!(output, "Hello");
/// ```
pub fn render_to_string(widget: &dyn Widget, width: usize) -> String {
    render_frame(widget, width).to_text()
}

/// Render a widget into a new frame of the given width.
pub fn render_frame(widget: &dyn Widget, width: usize) -> Frame {
    let mut frame = Frame::new(width);
    widget.render(&mut frame);
    frame
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Button, Static};

    #[test]
    fn render_static_to_text() {
        assert_eq!(render_to_string(&Static::new("Hello"), 20), "Hello");
    }

    #[test]
    fn render_static_multiline() {
        let output = render_to_string(&Static::new("Line1\nLine2"), 20);
        assert_eq!(output, "Line1\nLine2");
    }

    #[test]
    fn render_button_to_text() {
        insta::assert_snapshot!(render_to_string(&Button::new("OK"), 20), @"[ OK ]");
    }

    #[test]
    fn render_zero_width() {
        let frame = render_frame(&Static::new("Hello"), 0);
        assert_eq!(frame.height(), 1);
        assert_eq!(frame.to_text(), "");
    }

    #[test]
    fn render_trims_trailing_spaces() {
        assert_eq!(render_to_string(&Static::new("Hi   "), 20), "Hi");
    }
}
