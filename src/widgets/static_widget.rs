//! Static widget: displays fixed text content.

use std::any::Any;

use crate::render::Frame;
use crate::widget::Widget;

/// Non-interactive text. Lines split on `'\n'`, one row each.
///
/// Lines wider than the frame are clipped, or wrapped onto extra rows when
/// built with [`Static::wrap`].
///
/// # Examples
///
/// ```ignore
/// let indicator = Static::new("Loading...");
/// let body = Static::new(json).wrap(true);
/// ```
#[derive(Debug, Clone)]
pub struct Static {
    content: String,
    wrap: bool,
}

impl Static {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            wrap: false,
        }
    }

    /// Wrap over-wide lines instead of clipping them.
    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Widget for Static {
    fn widget_type(&self) -> &str {
        "Static"
    }

    fn render(&self, frame: &mut Frame) {
        if self.wrap {
            frame.push_wrapped(&self.content);
        } else {
            frame.push_text(&self.content);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
