//! App struct: mounting, the message loop, render passes, fetch tasks.
//!
//! [`App`] owns the component tree, the event dispatcher, key bindings and
//! the [`Fetcher`]. One pass of the loop is:
//!
//! 1. drain messages (input-derived, and fetch completions posted by tasks)
//! 2. apply them as state updates
//! 3. flush: render what was requested, then run the child's effects
//!
//! A child effect execution spawns a fetch on the ambient tokio runtime and
//! aborts the previous one. The task posts a [`FetchCompleted`] back to the
//! dispatcher; completions whose ticket is not the latest are dropped.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::dom::{ComponentId, ComponentTree};
use crate::event::binding::{BindingAction, KeyBindingRegistry};
use crate::event::handler::{EventDispatcher, MessageSender};
use crate::event::input::InputEvent;
use crate::event::message::{Envelope, FetchCompleted, Quit, Refresh, Toggle};
use crate::fetch::{FetchError, FetchTicket, Fetcher, HttpFetcher, DATA_ENDPOINT};
use crate::render::Frame;
use crate::widget::{LifecycleTracker, RenderRequests, Widget};
use crate::widgets::Parent;

/// Upper bound on render/effect passes per flush.
const MAX_FLUSH_PASSES: usize = 16;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Optional app title, logged on mount.
    pub title: Option<String>,
    /// Base URL the data endpoint is resolved against.
    pub base_url: String,
    /// Path of the data endpoint.
    pub endpoint: String,
    /// Frame width in columns.
    pub width: u16,
    /// Keep showing the previous payload while a refetch is in flight.
    pub retain_stale_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: None,
            base_url: "http://localhost:3000".to_owned(),
            endpoint: DATA_ENDPOINT.to_owned(),
            width: 80,
            retain_stale_data: false,
        }
    }
}

impl AppConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the base URL (builder).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the endpoint path (builder).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the frame width (builder).
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    /// Keep or reset the child's payload on refetch (builder).
    pub fn with_retain_stale_data(mut self, retain: bool) -> Self {
        self.retain_stale_data = retain;
        self
    }
}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Errors surfaced by the app loop.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The latest fetch failed. The child keeps its current data.
    #[error("fetch {ticket} failed")]
    Fetch {
        ticket: FetchTicket,
        #[source]
        source: FetchError,
    },
    /// The configured fetcher could not be built.
    #[error("invalid fetcher configuration")]
    Setup(#[from] FetchError),
    /// An effect tried to start a fetch outside a tokio runtime.
    #[error("no tokio runtime available to run the fetch")]
    NoRuntime,
}

// ---------------------------------------------------------------------------
// AppStats
// ---------------------------------------------------------------------------

/// Counters for what the loop has done so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppStats {
    /// Frames rendered.
    pub renders: u64,
    /// Fetch tasks spawned.
    pub fetches_issued: u64,
    /// Payloads stored in the child.
    pub fetches_applied: u64,
    /// Completions ignored because a newer fetch superseded them.
    pub stale_dropped: u64,
}

#[derive(Debug)]
struct InFlight {
    ticket: FetchTicket,
    task: JoinHandle<()>,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The main application struct.
pub struct App {
    /// Application configuration.
    pub config: AppConfig,
    /// Key binding registry.
    pub bindings: KeyBindingRegistry,
    /// Event dispatcher (message queue).
    pub dispatcher: EventDispatcher,
    tree: ComponentTree,
    lifecycle: LifecycleTracker,
    requests: RenderRequests,
    parent: Option<Parent>,
    fetcher: Arc<dyn Fetcher>,
    in_flight: Option<InFlight>,
    last_ticket: FetchTicket,
    stats: AppStats,
    frame: Frame,
    running: bool,
}

impl App {
    /// Create an app that fetches over HTTP from `config.base_url`.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let fetcher = HttpFetcher::new(&config.base_url)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Create an app with a custom fetcher.
    pub fn with_fetcher(config: AppConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let frame = Frame::new(usize::from(config.width));
        Self {
            config,
            bindings: KeyBindingRegistry::with_defaults(),
            dispatcher: EventDispatcher::new(),
            tree: ComponentTree::new(),
            lifecycle: LifecycleTracker::new(),
            requests: RenderRequests::new(),
            parent: None,
            fetcher,
            in_flight: None,
            last_ticket: FetchTicket(0),
            stats: AppStats::default(),
            frame,
            running: true,
        }
    }

    // ── Mounting ─────────────────────────────────────────────────────

    /// Mount the parent/child pair, render it, and run the first effects.
    ///
    /// Must run inside a tokio runtime, since mounting starts the first
    /// fetch. Outside one it fails with [`AppError::NoRuntime`] before
    /// creating anything, so it can be retried. Mounting twice is a no-op.
    pub fn mount(&mut self) -> Result<(), AppError> {
        if self.parent.is_some() {
            return Ok(());
        }
        current_runtime()?;
        let parent = Parent::mount(&mut self.tree, &self.requests, self.config.retain_stale_data);
        for id in [parent.id(), parent.button_id(), parent.child().id()] {
            self.lifecycle.on_mount(id);
        }
        info!(title = ?self.config.title, "mounted");
        self.parent = Some(parent);
        self.flush()
    }

    /// Unmount everything and abort the in-flight fetch.
    ///
    /// The components' signals and effects are disposed, freeing their
    /// runtime slots.
    pub fn unmount(&mut self) {
        if let Some(mut parent) = self.parent.take() {
            for id in parent.unmount(&mut self.tree) {
                self.lifecycle.on_unmount(id);
            }
        }
        if let Some(flight) = self.in_flight.take() {
            debug!(ticket = %flight.ticket, "aborting fetch on unmount");
            flight.task.abort();
        }
        self.requests.take();
        self.frame = Frame::new(usize::from(self.config.width));
    }

    pub fn is_mounted(&self) -> bool {
        self.parent.is_some()
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Translate an input event into messages.
    ///
    /// Keys go through the binding registry. A click lands on the nearest
    /// focusable component at or above its target, and becomes a `Toggle`
    /// when that is the button. A resize re-renders at the new width.
    pub fn handle_input(&mut self, event: InputEvent) {
        let Some(sender) = self.parent.as_ref().map(Parent::id) else {
            return;
        };
        match event {
            InputEvent::Key(ke) => match self.bindings.resolve(&ke) {
                Some(BindingAction::Quit) => self.dispatcher.push(Envelope::new(Quit, sender)),
                Some(BindingAction::Toggle) => self.dispatcher.push(Envelope::new(Toggle, sender)),
                Some(BindingAction::Refresh) => {
                    self.dispatcher.push(Envelope::new(Refresh, sender))
                }
                Some(BindingAction::Message(factory)) => self.dispatcher.push(Envelope {
                    message: factory(),
                    sender,
                    target: None,
                }),
                None => {}
            },
            InputEvent::Click { target } => {
                let hit = std::iter::once(target)
                    .chain(self.tree.ancestors(target))
                    .find(|id| self.tree.is_focusable(*id));
                let button = self.parent.as_ref().map(Parent::button_id);
                match hit {
                    Some(id) if Some(id) == button => {
                        self.dispatcher.push(Envelope::targeted(Toggle, id, sender));
                    }
                    _ => trace!(?target, "click ignored"),
                }
            }
            InputEvent::Resize { width } => {
                self.config.width = width;
                self.rerender();
            }
        }
    }

    /// Queue a toggle of the parent's state.
    pub fn toggle(&mut self) {
        if let Some(parent) = &self.parent {
            self.dispatcher.push(Envelope::new(Toggle, parent.id()));
        }
    }

    /// Request a parent render without changing any state.
    pub fn rerender(&mut self) {
        if let Some(parent) = &self.parent {
            self.requests.request(parent.id());
        }
    }

    /// A handle for posting messages into this app from other tasks.
    pub fn sender(&self) -> MessageSender {
        self.dispatcher.sender()
    }

    // ── Loop ─────────────────────────────────────────────────────────

    /// Process every pending message, then flush renders and effects.
    ///
    /// A failed fetch for the latest ticket is returned as
    /// [`AppError::Fetch`] after the rest of the pass has completed. If the
    /// flush fails in the same pass, the fetch failure wins and the flush
    /// error is logged.
    ///
    /// Lifecycle events not collected since the previous pass are logged at
    /// `trace` and discarded.
    pub fn process(&mut self) -> Result<(), AppError> {
        for event in self.lifecycle.pending_events() {
            trace!(?event, "lifecycle");
        }
        let mut failure = None;
        for envelope in self.dispatcher.drain() {
            if envelope.is::<Quit>() {
                self.running = false;
            } else if envelope.is::<Toggle>() {
                if let Some(parent) = &self.parent {
                    parent.toggle();
                }
            } else if envelope.is::<Refresh>() {
                self.rerender();
            } else if envelope.is::<FetchCompleted>() {
                let Some(done) = envelope.take::<FetchCompleted>() else {
                    continue;
                };
                if let Err(err) = self.complete(done) {
                    failure.get_or_insert(err);
                }
            } else {
                debug!(message = envelope.message.message_name(), "unhandled message");
            }
        }
        let flushed = self.flush();
        match failure {
            Some(err) => {
                if let Err(flush_err) = flushed {
                    error!(error = %flush_err, "flush failed in the same pass as a fetch");
                }
                Err(err)
            }
            None => flushed,
        }
    }

    /// Process until no fetch is in flight, waiting on the dispatcher.
    ///
    /// Returns on the first error. Never returns if a fetch never completes.
    pub async fn settle(&mut self) -> Result<(), AppError> {
        loop {
            self.process()?;
            if self.in_flight.is_none() && self.dispatcher.is_empty() {
                return Ok(());
            }
            self.dispatcher.wait().await;
        }
    }

    fn complete(&mut self, done: FetchCompleted) -> Result<(), AppError> {
        let FetchCompleted { ticket, result } = done;
        if self.in_flight.as_ref().is_some_and(|f| f.ticket == ticket) {
            self.in_flight = None;
        }
        let latest = self
            .parent
            .as_ref()
            .is_some_and(|p| p.child().is_latest(ticket));
        if !latest {
            warn!(%ticket, "dropping stale fetch completion");
            self.stats.stale_dropped += 1;
            return Ok(());
        }

        match result {
            Ok(payload) => {
                if let Some(parent) = self.parent.as_mut() {
                    if parent.child_mut().apply_payload(ticket, payload) {
                        self.stats.fetches_applied += 1;
                    }
                }
                Ok(())
            }
            Err(source) => {
                error!(%ticket, error = %source, "fetch failed");
                Err(AppError::Fetch { ticket, source })
            }
        }
    }

    /// Render requested components and run effects until nothing is pending.
    fn flush(&mut self) -> Result<(), AppError> {
        for _ in 0..MAX_FLUSH_PASSES {
            let requested = self.requests.take();
            if requested.is_empty() {
                // An effect left pending by a pass without a runtime runs here.
                return self.run_effects();
            }
            let Some(parent) = self.parent.as_mut() else {
                return Ok(());
            };
            if requested.contains(&parent.id()) {
                parent.reconcile();
            }
            for id in &requested {
                self.lifecycle.on_update(*id);
            }
            self.render_frame();
            self.run_effects()?;
        }
        warn!(passes = MAX_FLUSH_PASSES, "render requests did not settle");
        Ok(())
    }

    fn render_frame(&mut self) {
        let mut frame = Frame::new(usize::from(self.config.width));
        if let Some(parent) = &self.parent {
            parent.render(&mut frame);
        }
        self.frame = frame;
        self.stats.renders += 1;
    }

    /// Run the child's fetch effect if its dependencies changed.
    ///
    /// The runtime is checked before the effect commits, so a pass without
    /// one leaves the effect pending for the next pass.
    fn run_effects(&mut self) -> Result<(), AppError> {
        let Some(parent) = self.parent.as_mut() else {
            return Ok(());
        };
        if !parent.child().fetch_pending() {
            return Ok(());
        }
        let handle = current_runtime()?;
        let candidate = self.last_ticket.next();
        let origin = parent.child().id();
        if let Some(ticket) = parent.child_mut().run_effects(|| candidate) {
            self.last_ticket = ticket;
            self.spawn_fetch(&handle, ticket, origin);
        }
        Ok(())
    }

    fn spawn_fetch(&mut self, handle: &Handle, ticket: FetchTicket, origin: ComponentId) {
        if let Some(previous) = self.in_flight.take() {
            debug!(superseded = %previous.ticket, by = %ticket, "aborting previous fetch");
            previous.task.abort();
        }

        let fetcher = Arc::clone(&self.fetcher);
        let endpoint = self.config.endpoint.clone();
        let sender = self.dispatcher.sender();
        debug!(%ticket, endpoint = %endpoint, "spawning fetch");
        let task = handle.spawn(async move {
            let result = fetcher.fetch(&endpoint).await;
            sender.post(Envelope::targeted(FetchCompleted { ticket, result }, origin, origin));
        });

        self.in_flight = Some(InFlight { ticket, task });
        self.stats.fetches_issued += 1;
    }

    // ── Query ────────────────────────────────────────────────────────

    /// The last rendered frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// The last rendered frame as text.
    pub fn render_text(&self) -> String {
        self.frame.to_text()
    }

    pub fn stats(&self) -> AppStats {
        self.stats
    }

    pub fn parent(&self) -> Option<&Parent> {
        self.parent.as_ref()
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn lifecycle_mut(&mut self) -> &mut LifecycleTracker {
        &mut self.lifecycle
    }

    /// Whether a fetch task has been spawned and not yet completed.
    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the app should quit.
    pub fn should_quit(&self) -> bool {
        !self.running
    }

    /// Request the app to quit.
    pub fn request_quit(&mut self) {
        self.running = false;
    }
}

fn current_runtime() -> Result<Handle, AppError> {
    Handle::try_current().map_err(|_| AppError::NoRuntime)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::input::{Key, KeyEvent, Modifiers};
    use crate::testing::ScriptedFetcher;
    use crate::widget::LifecycleEvent;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn app_with(fetcher: &Arc<ScriptedFetcher>) -> App {
        App::with_fetcher(AppConfig::new().with_width(40), fetcher.clone())
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn new_app_is_unmounted_and_running() {
        let app = app_with(&Arc::new(ScriptedFetcher::new()));
        assert!(!app.is_mounted());
        assert!(!app.should_quit());
        assert_eq!(app.bindings.len(), 5);
        assert_eq!(app.stats(), AppStats::default());
    }

    #[test]
    fn new_rejects_bad_base_url() {
        let err = App::new(AppConfig::new().with_base_url("not a url")).err().unwrap();
        assert!(matches!(err, AppError::Setup(FetchError::InvalidUrl { .. })));
    }

    #[test]
    fn mount_outside_runtime_fails() {
        let mut app = app_with(&Arc::new(ScriptedFetcher::new()));
        assert!(matches!(app.mount(), Err(AppError::NoRuntime)));
    }

    fn current_thread_runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn failed_mount_leaves_nothing_behind_and_can_be_retried() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.respond(json!({"a": 1}));
        let mut app = app_with(&fetcher);

        assert!(matches!(app.mount(), Err(AppError::NoRuntime)));
        assert!(!app.is_mounted());
        assert!(app.tree().is_empty());
        assert_eq!(app.lifecycle_mut().mounted_count(), 0);
        assert_eq!(app.stats(), AppStats::default());

        let rt = current_thread_runtime();
        rt.block_on(async {
            app.mount().unwrap();
            assert_eq!(app.stats().fetches_issued, 1);
            app.settle().await.unwrap();
        });
        assert!(app.render_text().contains("\"a\": 1"));
        assert_eq!(fetcher.request_count(), 1);
    }

    #[test]
    fn effect_skipped_without_runtime_runs_on_next_pass() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let mut app = app_with(&fetcher);
        let rt = current_thread_runtime();
        {
            let _guard = rt.enter();
            app.mount().unwrap();
        }

        app.toggle();
        assert!(matches!(app.process(), Err(AppError::NoRuntime)));
        assert!(app.parent().unwrap().state());
        assert_eq!(app.stats().fetches_issued, 1);
        assert!(app.parent().unwrap().child().fetch_pending());

        let _guard = rt.enter();
        app.process().unwrap();
        assert_eq!(app.stats().fetches_issued, 2);
        assert!(app.render_text().contains("Loading..."));
    }

    #[test]
    fn fetch_failure_wins_over_flush_failure_in_same_pass() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let mut app = app_with(&fetcher);
        let rt = current_thread_runtime();
        {
            let _guard = rt.enter();
            app.mount().unwrap();
        }
        let child = app.parent().unwrap().child().id();
        app.sender().post(Envelope::new(
            FetchCompleted {
                ticket: FetchTicket(1),
                result: Err(FetchError::Status {
                    url: "http://localhost:3000/api/data".into(),
                    status: 502,
                }),
            },
            child,
        ));
        app.toggle();

        match app.process() {
            Err(AppError::Fetch { ticket, source }) => {
                assert_eq!(ticket, FetchTicket(1));
                assert!(matches!(source, FetchError::Status { status: 502, .. }));
            }
            other => panic!("expected the fetch failure, got {other:?}"),
        }
        assert!(!app.has_in_flight());
    }

    #[test]
    fn request_quit() {
        let mut app = app_with(&Arc::new(ScriptedFetcher::new()));
        app.request_quit();
        assert!(app.should_quit());
    }

    // ── Mount / fetch ────────────────────────────────────────────────

    #[tokio::test]
    async fn mount_renders_loading_and_issues_one_fetch() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let mut app = app_with(&fetcher);
        app.mount().unwrap();

        assert_eq!(app.render_text(), "[ Trigger Re-render ]\nLoading...");
        assert_eq!(app.stats().fetches_issued, 1);
        assert!(app.has_in_flight());
    }

    #[tokio::test]
    async fn settle_applies_payload() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.respond(json!({"a": 1}));
        let mut app = app_with(&fetcher);
        app.mount().unwrap();
        app.settle().await.unwrap();

        assert!(app.render_text().contains("\"a\": 1"));
        assert_eq!(app.stats().fetches_applied, 1);
        assert!(!app.has_in_flight());
        assert_eq!(fetcher.requests(), vec!["/api/data".to_owned()]);
    }

    #[tokio::test]
    async fn endpoint_comes_from_config() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.respond(json!(null));
        let config = AppConfig::new().with_endpoint("/api/other");
        let mut app = App::with_fetcher(config, fetcher.clone());
        app.mount().unwrap();
        app.settle().await.unwrap();
        assert_eq!(fetcher.requests(), vec!["/api/other".to_owned()]);
    }

    #[tokio::test]
    async fn mount_twice_is_noop() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let mut app = app_with(&fetcher);
        app.mount().unwrap();
        app.mount().unwrap();
        assert_eq!(app.tree().len(), 3);
        assert_eq!(app.stats().fetches_issued, 1);
    }

    #[tokio::test]
    async fn toggle_issues_one_more_fetch() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.respond(json!({"a": 1}));
        fetcher.respond(json!({"a": 2}));
        let mut app = app_with(&fetcher);
        app.mount().unwrap();
        app.settle().await.unwrap();

        app.toggle();
        app.process().unwrap();
        assert_eq!(app.stats().fetches_issued, 2);
        assert!(app.render_text().contains("Loading..."));

        app.settle().await.unwrap();
        assert!(app.render_text().contains("\"a\": 2"));
        assert_eq!(fetcher.request_count(), 2);
    }

    #[tokio::test]
    async fn rerender_without_toggle_does_not_fetch() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.respond(json!({"a": 1}));
        let mut app = app_with(&fetcher);
        app.mount().unwrap();
        app.settle().await.unwrap();
        let renders = app.stats().renders;

        app.rerender();
        app.process().unwrap();
        assert_eq!(app.stats().renders, renders + 1);
        assert_eq!(app.stats().fetches_issued, 1);
    }

    #[tokio::test]
    async fn failed_fetch_surfaces_and_keeps_loading() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.fail(FetchError::Status {
            url: "http://localhost:3000/api/data".into(),
            status: 500,
        });
        let mut app = app_with(&fetcher);
        app.mount().unwrap();

        let err = app.settle().await.unwrap_err();
        match err {
            AppError::Fetch { ticket, source } => {
                assert_eq!(ticket, FetchTicket(1));
                assert!(matches!(source, FetchError::Status { status: 500, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(app.render_text().contains("Loading..."));
        assert!(!app.has_in_flight());
    }

    #[tokio::test]
    async fn stale_completion_is_dropped() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.respond(json!({"a": 1}));
        let mut app = app_with(&fetcher);
        app.mount().unwrap();
        app.settle().await.unwrap();

        let child = app.parent().unwrap().child().id();
        app.sender().post(Envelope::new(
            FetchCompleted {
                ticket: FetchTicket(0),
                result: Ok(json!({"a": 99})),
            },
            child,
        ));
        app.process().unwrap();

        assert!(app.render_text().contains("\"a\": 1"));
        assert_eq!(app.stats().stale_dropped, 1);
    }

    // ── Input ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn key_t_produces_toggle() {
        let mut app = app_with(&Arc::new(ScriptedFetcher::new()));
        app.mount().unwrap();
        app.handle_input(InputEvent::Key(KeyEvent::plain(Key::Char('t'))));
        let messages = app.dispatcher.drain();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].is::<Toggle>());
    }

    #[tokio::test]
    async fn ctrl_c_quits() {
        let mut app = app_with(&Arc::new(ScriptedFetcher::new()));
        app.mount().unwrap();
        app.handle_input(InputEvent::Key(KeyEvent::new(Key::Char('c'), Modifiers::CTRL)));
        app.process().unwrap();
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn click_on_button_toggles_but_click_on_child_does_not() {
        let mut app = app_with(&Arc::new(ScriptedFetcher::new()));
        app.mount().unwrap();
        let parent = app.parent().unwrap();
        let (button, child) = (parent.button_id(), parent.child().id());

        app.handle_input(InputEvent::Click { target: child });
        assert!(app.dispatcher.is_empty());

        app.handle_input(InputEvent::Click { target: button });
        app.process().unwrap();
        assert!(app.parent().unwrap().state());
    }

    #[tokio::test]
    async fn click_with_stale_target_is_ignored() {
        let mut app = app_with(&Arc::new(ScriptedFetcher::new()));
        app.mount().unwrap();
        let old_button = app.parent().unwrap().button_id();
        app.unmount();
        app.mount().unwrap();

        app.handle_input(InputEvent::Click { target: old_button });
        assert!(app.dispatcher.is_empty());
        assert!(app.tree().ancestors(old_button).is_empty());
    }

    #[test]
    fn input_before_mount_is_ignored() {
        let mut app = app_with(&Arc::new(ScriptedFetcher::new()));
        app.handle_input(InputEvent::Key(KeyEvent::plain(Key::Char('q'))));
        assert!(app.dispatcher.is_empty());
    }

    #[tokio::test]
    async fn resize_rerenders_at_new_width() {
        let mut app = app_with(&Arc::new(ScriptedFetcher::new()));
        app.mount().unwrap();
        app.handle_input(InputEvent::Resize { width: 8 });
        app.process().unwrap();
        assert_eq!(app.frame().width(), 8);
        assert_eq!(app.render_text(), "[ Trigge\nLoading.");
        assert_eq!(app.stats().fetches_issued, 1);
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    #[tokio::test]
    async fn lifecycle_records_mount_and_unmount() {
        let mut app = app_with(&Arc::new(ScriptedFetcher::new()));
        app.mount().unwrap();
        let events = app.lifecycle_mut().pending_events();
        let mounts = events
            .iter()
            .filter(|e| matches!(e, LifecycleEvent::Mount { .. }))
            .count();
        assert_eq!(mounts, 3);

        app.unmount();
        assert!(!app.is_mounted());
        assert!(app.tree().is_empty());
        assert!(!app.has_in_flight());
        assert_eq!(app.lifecycle_mut().mounted_count(), 0);
        assert_eq!(app.render_text(), "");
    }

    #[tokio::test]
    async fn lifecycle_queue_stays_bounded_across_rerenders() {
        let mut app = app_with(&Arc::new(ScriptedFetcher::new()));
        app.mount().unwrap();
        for _ in 0..1_000 {
            app.rerender();
            app.process().unwrap();
        }
        let events = app.lifecycle_mut().pending_events();
        assert_eq!(events, vec![LifecycleEvent::Update { id: app.parent().unwrap().id() }]);
        assert_eq!(app.stats().renders, 1_001);
    }

    // ── AppConfig builder ────────────────────────────────────────────

    #[test]
    fn app_config_defaults() {
        let config = AppConfig::new();
        assert!(config.title.is_none());
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.endpoint, "/api/data");
        assert_eq!(config.width, 80);
        assert!(!config.retain_stale_data);
    }

    #[test]
    fn app_config_builder() {
        let config = AppConfig::new()
            .with_title("Demo")
            .with_base_url("http://example.test")
            .with_endpoint("/v1/data")
            .with_width(60)
            .with_retain_stale_data(true);
        assert_eq!(config.title.as_deref(), Some("Demo"));
        assert_eq!(config.base_url, "http://example.test");
        assert_eq!(config.endpoint, "/v1/data");
        assert_eq!(config.width, 60);
        assert!(config.retain_stale_data);
    }
}
