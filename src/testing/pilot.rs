//! Pilot: programmatic interaction with a headless App.
//!
//! The `Pilot` wraps an [`App`](crate::app::App) backed by a
//! [`ScriptedFetcher`] and provides methods to simulate user input, drive
//! the message loop, and read the rendered frame as text.

use std::sync::Arc;

use crate::app::{App, AppConfig, AppError, AppStats};
use crate::event::input::{InputEvent, Key, KeyEvent, Modifiers};
use crate::testing::ScriptedFetcher;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless app driver for testing.
///
/// # Examples
///
/// ```ignore
/// use refetch_tui::testing::Pilot;
/// use serde_json::json;
///
/// let mut pilot = Pilot::new(40);
/// pilot.fetcher().respond(json!({"a": 1}));
/// pilot.mount()?;
/// pilot.settle().await?;
/// assert!(pilot.render_text().contains("\"a\": 1"));
/// ```
pub struct Pilot {
    app: App,
    fetcher: Arc<ScriptedFetcher>,
}

impl Pilot {
    /// Create a pilot whose frame is `width` columns wide.
    pub fn new(width: u16) -> Self {
        Self::with_config(AppConfig::new().with_width(width))
    }

    /// Create a pilot from an [`AppConfig`]. The base URL is never contacted.
    pub fn with_config(config: AppConfig) -> Self {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let app = App::with_fetcher(config, fetcher.clone());
        Self { app, fetcher }
    }

    /// The scripted fetcher behind the app.
    pub fn fetcher(&self) -> &ScriptedFetcher {
        &self.fetcher
    }

    /// Mount the component pair. Needs a tokio runtime.
    pub fn mount(&mut self) -> Result<(), AppError> {
        self.app.mount()
    }

    pub fn unmount(&mut self) {
        self.app.unmount();
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) {
        self.app.handle_input(InputEvent::Key(KeyEvent::plain(key)));
    }

    /// Simulate a key press with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) {
        self.app
            .handle_input(InputEvent::Key(KeyEvent::new(key, modifiers)));
    }

    /// Simulate a click on the toggle button. No-op when unmounted.
    pub fn click_toggle(&mut self) {
        if let Some(button) = self.app.parent().map(|p| p.button_id()) {
            self.app.handle_input(InputEvent::Click { target: button });
        }
    }

    /// Simulate a viewport resize.
    pub fn resize(&mut self, width: u16) {
        self.app.handle_input(InputEvent::Resize { width });
    }

    /// Request a parent re-render with unchanged state.
    pub fn rerender(&mut self) {
        self.app.rerender();
    }

    // ── Processing ───────────────────────────────────────────────────

    /// Run one pass of the app loop.
    pub fn process(&mut self) -> Result<(), AppError> {
        self.app.process()
    }

    /// Run the loop until no fetch is in flight.
    pub async fn settle(&mut self) -> Result<(), AppError> {
        self.app.settle().await
    }

    // ── Query ────────────────────────────────────────────────────────

    /// The last rendered frame as text.
    pub fn render_text(&self) -> String {
        self.app.render_text()
    }

    pub fn stats(&self) -> AppStats {
        self.app.stats()
    }

    /// Borrow the underlying app immutably.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Borrow the underlying app mutably.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Whether the app is still running (has not quit).
    pub fn is_running(&self) -> bool {
        !self.app.should_quit()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
