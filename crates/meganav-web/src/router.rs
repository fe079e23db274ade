#![forbid(unsafe_code)]

//! Event routing between the host document and the controller.
//!
//! [`EventRouter`] maps each host [`NavSignal`] onto at most one
//! [`Transition`] and carries out controller [`Effect`]s against a
//! [`DomHost`]. It holds no navigation state of its own; the only thing it
//! tracks is which listener kinds are bound where, so every binding it makes
//! can be undone.
//!
//! # Bindings
//!
//! | target | kinds | lifetime |
//! |--------|-------|----------|
//! | nav root | hover + click (delegated) | attach → detach |
//! | hamburger | click | attach → detach |
//! | media query | change | attach → detach |
//! | each drop trigger | keydown | while tab-index capable (desktop) |
//! | window | Escape keydown | while the dismiss lease is held |
//! | nav root | focusout | while the dismiss lease is held |

use std::collections::BTreeMap;

use meganav_core::event::{KeyCode, ListenerSet, NavSignal};
use meganav_core::fragment::Element;
use meganav_widgets::controller::{Effect, FocusTarget, Transition};
use meganav_widgets::mega_panel::{HAMBURGER_ID, NavModel, SectionId, Target};

/// Where a listener is bound in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenTarget {
    /// `window`.
    Window,
    /// The `nav#nav` root.
    NavRoot,
    /// The hamburger button.
    Hamburger,
    /// A section's drop trigger.
    Section(SectionId),
    /// The desktop `matchMedia` query list.
    MediaQuery,
}

/// Operations the embedding document must provide.
///
/// Implementations forward to the real DOM (through JS glue) or record calls
/// for headless use.
pub trait DomHost {
    /// Attach listeners of `kinds` to `target`.
    fn listen(&mut self, target: ListenTarget, kinds: ListenerSet);

    /// Detach listeners of `kinds` from `target`.
    fn unlisten(&mut self, target: ListenTarget, kinds: ListenerSet);

    /// Move focus to the element stamped with `node_id`.
    fn focus(&mut self, node_id: &str);

    /// Lock or release body scroll.
    fn set_scroll_lock(&mut self, locked: bool);

    /// Replace the live nav with freshly rendered markup.
    fn commit(&mut self, markup: &Element);
}

/// Maps signals to transitions and effects to host calls.
#[derive(Debug, Default)]
pub struct EventRouter {
    bindings: BTreeMap<ListenTarget, ListenerSet>,
    attached: bool,
}

impl EventRouter {
    /// Create a detached router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`attach`](Self::attach) has run without a matching detach.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Listener kinds currently bound on `target`.
    #[must_use]
    pub fn bound(&self, target: ListenTarget) -> ListenerSet {
        self.bindings.get(&target).copied().unwrap_or_default()
    }

    /// Number of targets with at least one listener bound.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Bind the listeners that live as long as the nav.
    pub fn attach<H: DomHost + ?Sized>(&mut self, host: &mut H) {
        if self.attached {
            return;
        }
        self.attached = true;
        self.bind(host, ListenTarget::NavRoot, ListenerSet::HOVER | ListenerSet::CLICK);
        self.bind(host, ListenTarget::Hamburger, ListenerSet::CLICK);
        self.bind(host, ListenTarget::MediaQuery, ListenerSet::MEDIA_CHANGE);
        tracing::debug!(targets = self.bindings.len(), "router attached");
    }

    /// Unbind everything, leased listeners included.
    pub fn detach<H: DomHost + ?Sized>(&mut self, host: &mut H) {
        for (target, kinds) in std::mem::take(&mut self.bindings) {
            host.unlisten(target, kinds);
        }
        if self.attached {
            tracing::debug!("router detached");
        }
        self.attached = false;
    }

    fn bind<H: DomHost + ?Sized>(&mut self, host: &mut H, target: ListenTarget, kinds: ListenerSet) {
        let new = kinds - self.bound(target);
        if new.is_empty() {
            return;
        }
        *self.bindings.entry(target).or_default() |= new;
        host.listen(target, new);
    }

    fn unbind<H: DomHost + ?Sized>(&mut self, host: &mut H, target: ListenTarget, kinds: ListenerSet) {
        let Some(entry) = self.bindings.get_mut(&target) else {
            return;
        };
        let gone = kinds & *entry;
        if gone.is_empty() {
            return;
        }
        *entry -= gone;
        if entry.is_empty() {
            self.bindings.remove(&target);
        }
        host.unlisten(target, gone);
    }

    /// Map a host signal to a transition.
    ///
    /// `epoch` is used for hover signals that arrive unstamped. Breakpoint
    /// signals (`MediaChange`, `Resize`) go through the breakpoint observer,
    /// not the router, and map to `None` here.
    #[must_use]
    pub fn route(&self, model: &NavModel, epoch: u64, signal: NavSignal) -> Option<Transition> {
        match signal {
            NavSignal::PointerEnter { target, epoch: seen } => {
                matches!(model.target(&target), Some(Target::Hover(_))).then(|| Transition::HoverEnter {
                    target,
                    epoch: seen.unwrap_or(epoch),
                })
            }
            NavSignal::PointerLeave { target, epoch: seen } => {
                matches!(model.target(&target), Some(Target::Hover(_))).then(|| Transition::HoverLeave {
                    target,
                    epoch: seen.unwrap_or(epoch),
                })
            }
            NavSignal::Click { target } => match model.target(&target)? {
                Target::Section(section) => Some(Transition::ToggleSection(*section)),
                Target::Hamburger => Some(Transition::HamburgerClick),
                Target::Hover(_) | Target::Link => None,
            },
            NavSignal::KeyDown {
                key: KeyCode::Escape,
                ..
            } => Some(Transition::Escape),
            NavSignal::KeyDown {
                target: Some(target),
                key,
            } if key.is_activation() => match model.target(&target)? {
                Target::Section(section) => Some(Transition::KeyActivate {
                    section: *section,
                    key,
                }),
                _ => None,
            },
            NavSignal::KeyDown { .. } => None,
            NavSignal::FocusOut { related_target } => Some(Transition::FocusOut {
                related_inside: related_target.is_some_and(|id| model.contains_node(&id)),
            }),
            NavSignal::MediaChange { .. } | NavSignal::Resize { .. } => None,
        }
    }

    /// Carry out controller effects in order.
    pub fn apply_effects<H: DomHost + ?Sized>(&mut self, model: &NavModel, effects: &[Effect], host: &mut H) {
        for effect in effects {
            match *effect {
                Effect::Focus(FocusTarget::Section(section)) => host.focus(&section.node_id()),
                Effect::Focus(FocusTarget::Hamburger) => host.focus(HAMBURGER_ID),
                Effect::ScrollLock(locked) => host.set_scroll_lock(locked),
                Effect::AcquireListeners(kinds) => {
                    self.bind(host, ListenTarget::Window, kinds & ListenerSet::ESCAPE);
                    self.bind(host, ListenTarget::NavRoot, kinds & ListenerSet::FOCUS_OUT);
                }
                Effect::ReleaseListeners(kinds) => {
                    self.unbind(host, ListenTarget::Window, kinds & ListenerSet::ESCAPE);
                    self.unbind(host, ListenTarget::NavRoot, kinds & ListenerSet::FOCUS_OUT);
                }
                Effect::TabIndexCapability(capable) => self.rebind_triggers(model, capable, host),
            }
        }
    }

    /// Keyboard activation follows tab-index capability.
    fn rebind_triggers<H: DomHost + ?Sized>(&mut self, model: &NavModel, capable: bool, host: &mut H) {
        let triggers = model
            .sections()
            .iter()
            .filter(|s| s.entry.is_expandable())
            .map(|s| ListenTarget::Section(s.id));
        for target in triggers {
            if capable {
                self.bind(host, target, ListenerSet::KEYDOWN);
            } else {
                self.unbind(host, target, ListenerSet::KEYDOWN);
            }
        }
        tracing::trace!(capable, "drop trigger keyboard bindings updated");
    }
}

/// One recorded [`DomHost`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// `listen(target, kinds)`.
    Listen(ListenTarget, ListenerSet),
    /// `unlisten(target, kinds)`.
    Unlisten(ListenTarget, ListenerSet),
    /// `focus(node_id)`.
    Focus(String),
    /// `set_scroll_lock(locked)`.
    ScrollLock(bool),
    /// `commit(markup)`, serialized.
    Commit(String),
}

/// Host that records calls and tracks the resulting document state.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
    listeners: BTreeMap<ListenTarget, ListenerSet>,
    focused: Option<String>,
    scroll_locked: bool,
    markup: Option<Element>,
    commits: usize,
}

impl RecordingHost {
    /// Create an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call in order.
    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Drain the call log.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    /// Listener kinds currently attached on `target`.
    #[must_use]
    pub fn listeners(&self, target: ListenTarget) -> ListenerSet {
        self.listeners.get(&target).copied().unwrap_or_default()
    }

    /// Whether any listener is still attached.
    #[must_use]
    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Element that last received focus.
    #[must_use]
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Whether body scroll is locked.
    #[must_use]
    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Most recently committed markup.
    #[must_use]
    pub fn markup(&self) -> Option<&Element> {
        self.markup.as_ref()
    }

    /// Number of commits.
    #[must_use]
    pub fn commits(&self) -> usize {
        self.commits
    }
}

impl DomHost for RecordingHost {
    fn listen(&mut self, target: ListenTarget, kinds: ListenerSet) {
        *self.listeners.entry(target).or_default() |= kinds;
        self.calls.push(HostCall::Listen(target, kinds));
    }

    fn unlisten(&mut self, target: ListenTarget, kinds: ListenerSet) {
        if let Some(entry) = self.listeners.get_mut(&target) {
            *entry -= kinds;
            if entry.is_empty() {
                self.listeners.remove(&target);
            }
        }
        self.calls.push(HostCall::Unlisten(target, kinds));
    }

    fn focus(&mut self, node_id: &str) {
        self.focused = Some(node_id.to_string());
        self.calls.push(HostCall::Focus(node_id.to_string()));
    }

    fn set_scroll_lock(&mut self, locked: bool) {
        self.scroll_locked = locked;
        self.calls.push(HostCall::ScrollLock(locked));
    }

    fn commit(&mut self, markup: &Element) {
        self.commits += 1;
        self.calls.push(HostCall::Commit(markup.to_html()));
        self.markup = Some(markup.clone());
    }
}
