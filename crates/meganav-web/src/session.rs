#![forbid(unsafe_code)]

//! Step-based navigation session.
//!
//! [`NavSession`] owns one navigation instance: the controller, the router,
//! the breakpoint observer, and the host. The host drives it:
//!
//! 1. Push DOM signals via [`NavSession::push_signal`].
//! 2. Call [`NavSession::step`] to process the queued batch in order.
//! 3. Read the committed markup from the host.
//!
//! No threads and no blocking. Transitions run synchronously in delivery
//! order, and at most one render is committed per step.
//!
//! # Example
//!
//! ```
//! use meganav_core::config::NavConfig;
//! use meganav_core::event::NavSignal;
//! use meganav_core::fragment::Element;
//! use meganav_web::router::RecordingHost;
//! use meganav_web::session::NavSession;
//!
//! let root = Element::new("div");
//! let mut session = NavSession::new(&root, NavConfig::default(), 1280, RecordingHost::new());
//! session.init().unwrap();
//!
//! session.push_signal(NavSignal::Resize { width: 600 });
//! let result = session.step().unwrap();
//! assert_eq!(result.signals_processed, 1);
//! assert!(result.rendered);
//! ```

use std::collections::VecDeque;
use std::fmt;

use meganav_core::breakpoint::MediaQueryObserver;
use meganav_core::config::NavConfig;
use meganav_core::event::NavSignal;
use meganav_core::fragment::Element;
use meganav_widgets::controller::{NavigationState, ResponsiveController, Transition};
use meganav_widgets::diagnostics::Diagnostics;
use meganav_widgets::mega_panel::NavModel;
use meganav_widgets::render::render_nav;

use crate::router::{DomHost, EventRouter};

/// Session lifecycle errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// [`NavSession::init`] was called twice.
    AlreadyInitialized,
    /// [`NavSession::step`] was called before `init`.
    NotInitialized,
    /// The session was torn down.
    TornDown,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInitialized => write!(f, "session already initialized"),
            Self::NotInitialized => write!(f, "session stepped before init"),
            Self::TornDown => write!(f, "session was torn down"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Result of a single [`NavSession::step`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepResult {
    /// Signals taken off the queue.
    pub signals_processed: u32,
    /// Signals that mapped to a transition.
    pub transitions: u32,
    /// Hover signals dropped as stale.
    pub dropped_stale: u32,
    /// Whether markup was committed.
    pub rendered: bool,
    /// Layout epoch after the step.
    pub epoch: u64,
}

/// Host-driven owner of one navigation instance.
#[derive(Debug)]
pub struct NavSession<H: DomHost> {
    config: NavConfig,
    controller: ResponsiveController,
    router: EventRouter,
    observer: MediaQueryObserver,
    host: H,
    queue: VecDeque<NavSignal>,
    diagnostics: Diagnostics,
    rendered_epoch: u64,
    frame_idx: u64,
    initialized: bool,
    torn_down: bool,
}

impl<H: DomHost> NavSession<H> {
    /// Build the navigation from a fragment root for a viewport of
    /// `viewport_width` CSS pixels.
    pub fn new(root: &Element, config: NavConfig, viewport_width: u32, host: H) -> Self {
        let (model, diagnostics) = NavModel::build(root, &config);
        let observer = MediaQueryObserver::new(config.desktop_min_width, viewport_width);
        let controller = ResponsiveController::new(model, &observer);
        Self {
            config,
            controller,
            router: EventRouter::new(),
            observer,
            host,
            queue: VecDeque::new(),
            diagnostics,
            rendered_epoch: 0,
            frame_idx: 0,
            initialized: false,
            torn_down: false,
        }
    }

    /// Attach listeners, derive the initial layout, and commit the first render.
    pub fn init(&mut self) -> Result<(), SessionError> {
        if self.torn_down {
            return Err(SessionError::TornDown);
        }
        if self.initialized {
            return Err(SessionError::AlreadyInitialized);
        }
        self.initialized = true;
        self.router.attach(&mut self.host);
        let outcome = self.controller.start();
        self.router
            .apply_effects(self.controller.model(), &outcome.effects, &mut self.host);
        self.render();
        tracing::debug!(
            breakpoint = ?self.controller.state().breakpoint(),
            sections = self.controller.model().sections().len(),
            degradations = self.diagnostics.len(),
            "navigation session initialized"
        );
        Ok(())
    }

    /// Queue a host signal.
    ///
    /// Hover signals without an epoch are stamped with the epoch of the
    /// markup the host currently shows.
    pub fn push_signal(&mut self, signal: NavSignal) {
        let signal = match signal {
            NavSignal::PointerEnter { target, epoch } => NavSignal::PointerEnter {
                target,
                epoch: Some(epoch.unwrap_or(self.rendered_epoch)),
            },
            NavSignal::PointerLeave { target, epoch } => NavSignal::PointerLeave {
                target,
                epoch: Some(epoch.unwrap_or(self.rendered_epoch)),
            },
            other => other,
        };
        self.queue.push_back(signal);
    }

    /// Parse and queue a JSON-encoded host signal.
    ///
    /// Kinds the navigation does not react to are accepted and ignored.
    #[cfg(feature = "signal-parser")]
    pub fn push_json(&mut self, json: &str) -> Result<(), crate::signal_parser::SignalParseError> {
        if let Some(signal) = crate::signal_parser::parse_signal(json)? {
            self.push_signal(signal);
        }
        Ok(())
    }

    /// Number of queued signals.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Process every queued signal, then render once if state changed.
    pub fn step(&mut self) -> Result<StepResult, SessionError> {
        if self.torn_down {
            return Err(SessionError::TornDown);
        }
        if !self.initialized {
            return Err(SessionError::NotInitialized);
        }

        let mut result = StepResult::default();
        let mut dirty = false;
        while let Some(signal) = self.queue.pop_front() {
            result.signals_processed += 1;
            let kind = signal.kind();
            let Some(transition) = self.to_transition(signal) else {
                tracing::trace!(signal = kind, "signal ignored");
                continue;
            };
            result.transitions += 1;
            let outcome = self.controller.apply(transition);
            if outcome.dropped_stale {
                result.dropped_stale += 1;
            }
            dirty |= outcome.changed;
            self.router
                .apply_effects(self.controller.model(), &outcome.effects, &mut self.host);
        }

        if dirty {
            self.render();
            result.rendered = true;
        }
        result.epoch = self.controller.state().epoch();
        Ok(result)
    }

    fn to_transition(&mut self, signal: NavSignal) -> Option<Transition> {
        match signal {
            NavSignal::MediaChange { desktop } => self
                .observer
                .update_match(desktop)
                .map(Transition::BreakpointChanged),
            NavSignal::Resize { width } => self
                .observer
                .update_width(width)
                .map(Transition::BreakpointChanged),
            other => self
                .router
                .route(self.controller.model(), self.controller.state().epoch(), other),
        }
    }

    fn render(&mut self) {
        let markup = render_nav(self.controller.model(), self.controller.state(), &self.config);
        self.host.commit(&markup);
        self.rendered_epoch = self.controller.state().epoch();
        self.frame_idx += 1;
    }

    /// Release every listener and lock, and drop pending signals.
    ///
    /// Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        let dropped = self.queue.len();
        self.queue.clear();
        let effects = self.controller.teardown();
        self.router
            .apply_effects(self.controller.model(), &effects, &mut self.host);
        self.router.detach(&mut self.host);
        tracing::debug!(dropped_signals = dropped, "navigation session torn down");
    }

    /// Current navigation state.
    #[must_use]
    pub fn state(&self) -> &NavigationState {
        self.controller.state()
    }

    /// The controller.
    #[must_use]
    pub fn controller(&self) -> &ResponsiveController {
        &self.controller
    }

    /// The router.
    #[must_use]
    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    /// What degraded while building the navigation.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Number of commits made.
    #[must_use]
    pub fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Tear down and return the host.
    pub fn into_host(mut self) -> H {
        self.teardown();
        self.host
    }
}
