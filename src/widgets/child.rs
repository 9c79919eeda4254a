//! Child component: fetches data and shows it.
//!
//! The child owns one piece of state, [`ChildData`], and one side effect: a
//! fetch of the data endpoint. The effect is gated on a dependency list
//! holding the `parent_state` prop, so it runs on mount and again on every
//! render where that prop differs from its value at the previous run. Renders
//! with an unchanged prop never fetch.
//!
//! ```text
//!  mount ──► Loading ──(fetch ok)──► Loaded(data)
//!               ▲                        │
//!               └──(parent_state changed)┘
//! ```

use std::any::Any;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use crate::dom::ComponentId;
use crate::fetch::FetchTicket;
use crate::reactive::{
    create_effect, create_signal, dispose_effect, dispose_signal, DepsEffect, EffectId,
    ReadSignal, WriteSignal,
};
use crate::render::Frame;
use crate::widget::{RenderRequests, Widget};
use crate::widgets::Static;

/// Text shown while no payload is available.
pub const LOADING_TEXT: &str = "Loading...";

/// Heading shown above a loaded payload.
pub const HEADING: &str = "Child Component";

// ---------------------------------------------------------------------------
// ChildData
// ---------------------------------------------------------------------------

/// The child's fetched state.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildData {
    /// Nothing loaded yet, or a refetch reset the previous payload.
    Loading,
    /// The decoded response body, stored verbatim.
    Loaded(Value),
}

impl ChildData {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Loading => None,
            Self::Loaded(value) => Some(value),
        }
    }

    /// Decode the payload into a typed value. `None` while loading.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        self.payload().map(|value| T::deserialize(value))
    }

    /// The payload as two-space-indented JSON.
    pub fn pretty(&self) -> Option<String> {
        let value = self.payload()?;
        Some(serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ChildProps
// ---------------------------------------------------------------------------

/// Inputs the parent passes down on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChildProps {
    pub parent_state: bool,
}

// ---------------------------------------------------------------------------
// Child
// ---------------------------------------------------------------------------

/// The data-fetching child component.
#[derive(Debug)]
pub struct Child {
    id: ComponentId,
    props: ChildProps,
    data: ReadSignal<ChildData>,
    set_data: WriteSignal<ChildData>,
    watcher: EffectId,
    fetch_effect: DepsEffect<bool>,
    latest: Option<FetchTicket>,
    retain_stale_data: bool,
}

impl Child {
    /// Create the child's state and subscribe it to re-render on data changes.
    ///
    /// No fetch happens here; the effect runs after the first commit.
    pub fn mount(
        id: ComponentId,
        props: ChildProps,
        requests: RenderRequests,
        retain_stale_data: bool,
    ) -> Self {
        let (data, set_data) = create_signal(ChildData::Loading);
        let watcher = create_effect(move || {
            data.with(|_| ());
            requests.request(id);
        });
        Self {
            id,
            props,
            data,
            set_data,
            watcher,
            fetch_effect: DepsEffect::new(),
            latest: None,
            retain_stale_data,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn props(&self) -> ChildProps {
        self.props
    }

    /// Receive props from a parent render.
    pub fn set_props(&mut self, props: ChildProps) {
        self.props = props;
    }

    /// Current data, without subscribing anything.
    pub fn data(&self) -> ChildData {
        self.data.get_untracked()
    }

    /// Run the fetch effect if the dependency list changed since its last run.
    ///
    /// `issue` is called once per execution and returns the ticket for the
    /// fetch the app is about to start. Returns that ticket, or `None` when
    /// the dependencies are unchanged.
    pub fn run_effects(&mut self, issue: impl FnOnce() -> FetchTicket) -> Option<FetchTicket> {
        let set_data = self.set_data;
        let retain = self.retain_stale_data;
        let deps = self.props.parent_state;

        let ticket = self.fetch_effect.run_if_changed(deps, || {
            if !retain {
                set_data.set_if_changed(ChildData::Loading);
            }
            issue()
        })?;

        debug!(%ticket, parent_state = deps, "child fetch effect ran");
        self.latest = Some(ticket);
        Some(ticket)
    }

    /// Whether the next `run_effects` call would execute the fetch effect.
    pub fn fetch_pending(&self) -> bool {
        self.fetch_effect.should_run(&self.props.parent_state)
    }

    /// Whether `ticket` belongs to the most recent effect execution.
    pub fn is_latest(&self, ticket: FetchTicket) -> bool {
        self.latest == Some(ticket)
    }

    /// Store a successful fetch result.
    ///
    /// Completions from superseded executions are ignored; returns whether
    /// the payload was stored.
    pub fn apply_payload(&mut self, ticket: FetchTicket, payload: Value) -> bool {
        if !self.is_latest(ticket) {
            trace!(%ticket, "ignoring stale payload");
            return false;
        }
        self.set_data.set(ChildData::Loaded(payload));
        true
    }

    /// Number of times the fetch effect has executed.
    pub fn fetch_runs(&self) -> u64 {
        self.fetch_effect.run_count()
    }

    /// Stop reacting to state changes and free the data signal. Any in-flight
    /// completion becomes stale.
    pub fn unmount(&mut self) {
        dispose_effect(self.watcher);
        dispose_signal(self.data);
        self.fetch_effect.reset();
        self.latest = None;
    }
}

impl Widget for Child {
    fn widget_type(&self) -> &str {
        "Child"
    }

    fn render(&self, frame: &mut Frame) {
        match self.data().pretty() {
            None => Static::new(LOADING_TEXT).render(frame),
            Some(pretty) => {
                Static::new(HEADING).render(frame);
                Static::new(pretty).wrap(true).render(frame);
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
