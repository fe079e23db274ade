#![forbid(unsafe_code)]

//! Responsive navigation state machine.
//!
//! [`ResponsiveController`] is the single writer of [`NavigationState`]. Every
//! host signal, once routed, becomes one [`Transition`]; applying it yields a
//! [`TransitionOutcome`] listing the side effects the host must perform
//! (focus moves, scroll lock, listener attach/detach).
//!
//! # States
//!
//! `{Collapsed, Expanded} × {NoDropdownOpen, DropdownOpen(section)}`, crossed
//! with [`Breakpoint`]. On desktop the bar itself counts as expanded and only
//! dropdowns toggle; on mobile the whole nav is one collapsible unit whose
//! sections open together as an accordion.
//!
//! # Invariants
//!
//! 1. At most one section is open.
//! 2. A panel is visible only while its section is open and one of its
//!    entries is hovered; hover-out clears it, never leaving a stale panel.
//! 3. The dismiss lease (Escape + focus-out listeners) is held exactly while
//!    a dropdown is open or the mobile nav is expanded, and is released on
//!    every exit path, including forced collapses from breakpoint changes.
//! 4. Hover transitions stamped with an older layout epoch are dropped.

use meganav_core::breakpoint::{Breakpoint, BreakpointObserver};
use meganav_core::event::{KeyCode, ListenerSet};

use crate::mega_panel::{NavModel, PanelId, SectionId, Target};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Current visibility state of the navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    breakpoint: Breakpoint,
    nav_expanded: bool,
    expanded_section: Option<SectionId>,
    sections_open: bool,
    visible_panel: Option<PanelId>,
    active_image: Option<String>,
    hovered: Option<String>,
    scroll_locked: bool,
    epoch: u64,
}

impl NavigationState {
    fn initial(breakpoint: Breakpoint) -> Self {
        Self {
            breakpoint,
            nav_expanded: false,
            expanded_section: None,
            sections_open: false,
            visible_panel: None,
            active_image: None,
            hovered: None,
            scroll_locked: false,
            epoch: 0,
        }
    }

    /// Active layout.
    #[inline]
    #[must_use]
    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    /// Whether the nav root is expanded (`aria-expanded` on the root).
    #[inline]
    #[must_use]
    pub fn nav_expanded(&self) -> bool {
        self.nav_expanded
    }

    /// The open desktop dropdown.
    #[inline]
    #[must_use]
    pub fn expanded_section(&self) -> Option<SectionId> {
        self.expanded_section
    }

    /// Whether mobile accordion sections are open.
    #[inline]
    #[must_use]
    pub fn sections_open(&self) -> bool {
        self.sections_open
    }

    /// Panel currently shown.
    #[inline]
    #[must_use]
    pub fn visible_panel(&self) -> Option<&PanelId> {
        self.visible_panel.as_ref()
    }

    /// Image currently shown in the open mega's right column.
    #[inline]
    #[must_use]
    pub fn active_image(&self) -> Option<&str> {
        self.active_image.as_deref()
    }

    /// Node id of the hovered mega entry.
    #[inline]
    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Whether body scroll is locked.
    #[inline]
    #[must_use]
    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Layout epoch, bumped on every breakpoint change.
    #[inline]
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether `section` counts as expanded in the current layout.
    #[must_use]
    pub fn is_section_expanded(&self, section: SectionId) -> bool {
        match self.breakpoint {
            Breakpoint::Desktop => self.expanded_section == Some(section),
            Breakpoint::Mobile => self.nav_expanded && self.sections_open,
        }
    }

    fn clear_hover(&mut self) {
        self.hovered = None;
        self.visible_panel = None;
    }
}

// ---------------------------------------------------------------------------
// Transitions and effects
// ---------------------------------------------------------------------------

/// A state machine input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The observer reported a new breakpoint.
    BreakpointChanged(Breakpoint),
    /// Click on a section trigger (desktop).
    ToggleSection(SectionId),
    /// Click on the hamburger (mobile).
    HamburgerClick,
    /// Escape pressed.
    Escape,
    /// Focus left a nav element.
    FocusOut {
        /// Whether the element receiving focus is inside the nav.
        related_inside: bool,
    },
    /// Pointer entered a mega entry.
    HoverEnter {
        /// Node id of the entry.
        target: String,
        /// Layout epoch the signal was produced under.
        epoch: u64,
    },
    /// Pointer left a mega entry.
    HoverLeave {
        /// Node id of the entry.
        target: String,
        /// Layout epoch the signal was produced under.
        epoch: u64,
    },
    /// Key pressed on a focused section trigger.
    KeyActivate {
        /// The focused section.
        section: SectionId,
        /// The key pressed.
        key: KeyCode,
    },
}

impl Transition {
    fn name(&self) -> &'static str {
        match self {
            Self::BreakpointChanged(_) => "breakpoint_changed",
            Self::ToggleSection(_) => "toggle_section",
            Self::HamburgerClick => "hamburger_click",
            Self::Escape => "escape",
            Self::FocusOut { .. } => "focus_out",
            Self::HoverEnter { .. } => "hover_enter",
            Self::HoverLeave { .. } => "hover_leave",
            Self::KeyActivate { .. } => "key_activate",
        }
    }
}

/// Where focus should move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// A section's drop trigger.
    Section(SectionId),
    /// The hamburger button.
    Hamburger,
}

/// Side effect for the host to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Move focus.
    Focus(FocusTarget),
    /// Lock (`true`) or release (`false`) body scroll.
    ScrollLock(bool),
    /// Attach window/nav-level listeners.
    AcquireListeners(ListenerSet),
    /// Detach window/nav-level listeners.
    ReleaseListeners(ListenerSet),
    /// Drop triggers gain (`true`) or lose (`false`) keyboard focusability.
    TabIndexCapability(bool),
}

/// Result of applying one transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionOutcome {
    /// Whether the navigation state changed.
    pub changed: bool,
    /// Whether the transition was dropped as stale.
    pub dropped_stale: bool,
    /// Effects in the order the host must apply them.
    pub effects: Vec<Effect>,
}

/// Listener lease held while something is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DismissLease {
    kinds: ListenerSet,
    acquired_epoch: u64,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owner of the navigation model and the single writer of its state.
#[derive(Debug)]
pub struct ResponsiveController {
    model: NavModel,
    state: NavigationState,
    lease: Option<DismissLease>,
    started: bool,
}

impl ResponsiveController {
    /// Create a controller in the collapsed state, reading the breakpoint
    /// from `observer`.
    #[must_use]
    pub fn new(model: NavModel, observer: &dyn BreakpointObserver) -> Self {
        Self {
            model,
            state: NavigationState::initial(observer.current()),
            lease: None,
            started: false,
        }
    }

    /// Derive the layout for the initial breakpoint.
    ///
    /// Returns the effects the host must apply before the first render.
    /// Calling it again is a no-op.
    pub fn start(&mut self) -> TransitionOutcome {
        if self.started {
            return TransitionOutcome::default();
        }
        self.started = true;
        let before = self.state.clone();
        let mut effects = Vec::new();
        self.derive_layout(&mut effects);
        self.reconcile_lease(&mut effects);
        tracing::debug!(
            breakpoint = ?self.state.breakpoint,
            nav_expanded = self.state.nav_expanded,
            "navigation controller started"
        );
        TransitionOutcome {
            changed: before != self.state,
            dropped_stale: false,
            effects,
        }
    }

    /// The immutable navigation model.
    #[inline]
    #[must_use]
    pub fn model(&self) -> &NavModel {
        &self.model
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Whether drop triggers should be keyboard-focusable.
    #[inline]
    #[must_use]
    pub fn has_tab_index_capability(&self) -> bool {
        self.state.breakpoint.is_desktop()
    }

    /// Whether the dismiss listeners are currently leased.
    #[inline]
    #[must_use]
    pub fn lease_active(&self) -> bool {
        self.lease.is_some()
    }

    /// Apply one transition.
    pub fn apply(&mut self, transition: Transition) -> TransitionOutcome {
        let before = self.state.clone();
        let mut effects = Vec::new();
        let name = transition.name();

        let dropped_stale = match transition {
            Transition::BreakpointChanged(bp) => {
                self.on_breakpoint(bp, &mut effects);
                false
            }
            Transition::ToggleSection(section) => {
                self.on_toggle(section);
                false
            }
            Transition::KeyActivate { section, key } => {
                if key.is_activation() {
                    self.on_toggle(section);
                }
                false
            }
            Transition::HamburgerClick => {
                self.on_hamburger(&mut effects);
                false
            }
            Transition::Escape => {
                self.dismiss(true, &mut effects);
                false
            }
            Transition::FocusOut { related_inside } => {
                if !related_inside {
                    self.dismiss(false, &mut effects);
                }
                false
            }
            Transition::HoverEnter { target, epoch } => {
                let stale = self.is_stale(epoch);
                if !stale {
                    self.on_hover_enter(&target);
                }
                stale
            }
            Transition::HoverLeave { target, epoch } => {
                let stale = self.is_stale(epoch);
                if !stale {
                    self.on_hover_leave(&target);
                }
                stale
            }
        };

        self.reconcile_lease(&mut effects);
        let changed = before != self.state;
        if dropped_stale {
            tracing::trace!(transition = name, epoch = self.state.epoch, "stale hover dropped");
        } else if changed {
            tracing::debug!(
                transition = name,
                breakpoint = ?self.state.breakpoint,
                nav_expanded = self.state.nav_expanded,
                from_section = ?before.expanded_section,
                to_section = ?self.state.expanded_section,
                panel = ?self.state.visible_panel,
                "navigation transition"
            );
        }
        TransitionOutcome {
            changed,
            dropped_stale,
            effects,
        }
    }

    /// Release everything held; used when the nav is torn down.
    pub fn teardown(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(lease) = self.lease.take() {
            effects.push(Effect::ReleaseListeners(lease.kinds));
        }
        if self.state.scroll_locked {
            self.state.scroll_locked = false;
            effects.push(Effect::ScrollLock(false));
        }
        effects
    }

    // -----------------------------------------------------------------------
    // Transition handlers
    // -----------------------------------------------------------------------

    fn is_stale(&self, epoch: u64) -> bool {
        epoch != self.state.epoch
    }

    fn on_breakpoint(&mut self, bp: Breakpoint, effects: &mut Vec<Effect>) {
        if bp == self.state.breakpoint {
            return;
        }
        self.state.breakpoint = bp;
        self.state.epoch += 1;
        self.derive_layout(effects);
    }

    /// Force the layout convention for the current breakpoint.
    fn derive_layout(&mut self, effects: &mut Vec<Effect>) {
        let desktop = self.state.breakpoint.is_desktop();
        self.state.nav_expanded = desktop;
        self.state.expanded_section = None;
        self.state.sections_open = false;
        self.state.active_image = None;
        self.state.clear_hover();
        if self.state.scroll_locked {
            self.state.scroll_locked = false;
            effects.push(Effect::ScrollLock(false));
        }
        effects.push(Effect::TabIndexCapability(desktop));
    }

    fn on_toggle(&mut self, section: SectionId) {
        if !self.state.breakpoint.is_desktop() {
            return;
        }
        let expandable = self
            .model
            .section(section)
            .is_some_and(|s| s.entry.is_expandable());
        if !expandable {
            return;
        }
        self.state.clear_hover();
        if self.state.expanded_section == Some(section) {
            self.state.expanded_section = None;
            self.state.active_image = None;
        } else {
            self.state.expanded_section = Some(section);
            self.state.active_image = self.model.resolve_image(section, None);
        }
    }

    fn on_hamburger(&mut self, effects: &mut Vec<Effect>) {
        if self.state.breakpoint.is_desktop() {
            return;
        }
        if self.state.nav_expanded {
            self.collapse_mobile(effects);
        } else {
            self.state.nav_expanded = true;
            self.state.sections_open = true;
            self.state.scroll_locked = true;
            effects.push(Effect::ScrollLock(true));
        }
    }

    fn collapse_mobile(&mut self, effects: &mut Vec<Effect>) {
        self.state.nav_expanded = false;
        self.state.sections_open = false;
        self.state.active_image = None;
        self.state.clear_hover();
        if self.state.scroll_locked {
            self.state.scroll_locked = false;
            effects.push(Effect::ScrollLock(false));
        }
    }

    /// Shared Escape / focus-loss closing behavior.
    fn dismiss(&mut self, restore_focus: bool, effects: &mut Vec<Effect>) {
        match self.state.breakpoint {
            Breakpoint::Desktop => {
                if let Some(section) = self.state.expanded_section.take() {
                    self.state.active_image = None;
                    self.state.clear_hover();
                    if restore_focus {
                        effects.push(Effect::Focus(FocusTarget::Section(section)));
                    }
                }
            }
            Breakpoint::Mobile => {
                if self.state.nav_expanded {
                    self.collapse_mobile(effects);
                    if restore_focus {
                        effects.push(Effect::Focus(FocusTarget::Hamburger));
                    }
                }
            }
        }
    }

    fn on_hover_enter(&mut self, node_id: &str) {
        let Some(Target::Hover(hover)) = self.model.target(node_id) else {
            return;
        };
        if !self.state.is_section_expanded(hover.section) {
            return;
        }
        self.state.hovered = Some(node_id.to_string());
        self.state.visible_panel = hover.target_panel_id.clone();
        self.state.active_image = self.model.resolve_image(hover.section, Some(hover));
    }

    fn on_hover_leave(&mut self, node_id: &str) {
        if self.state.hovered.as_deref() != Some(node_id) {
            return;
        }
        let section = match self.model.target(node_id) {
            Some(Target::Hover(hover)) => Some(hover.section),
            _ => None,
        };
        self.state.clear_hover();
        self.state.active_image = section.and_then(|s| self.model.resolve_image(s, None));
    }

    // -----------------------------------------------------------------------
    // Listener lease
    // -----------------------------------------------------------------------

    fn wants_lease(&self) -> bool {
        match self.state.breakpoint {
            Breakpoint::Desktop => self.state.expanded_section.is_some(),
            Breakpoint::Mobile => self.state.nav_expanded,
        }
    }

    fn reconcile_lease(&mut self, effects: &mut Vec<Effect>) {
        match (self.wants_lease(), self.lease) {
            (true, None) => {
                let lease = DismissLease {
                    kinds: ListenerSet::DISMISS,
                    acquired_epoch: self.state.epoch,
                };
                tracing::trace!(epoch = lease.acquired_epoch, "dismiss listeners acquired");
                effects.push(Effect::AcquireListeners(lease.kinds));
                self.lease = Some(lease);
            }
            (false, Some(lease)) => {
                tracing::trace!(
                    acquired_epoch = lease.acquired_epoch,
                    epoch = self.state.epoch,
                    "dismiss listeners released"
                );
                effects.push(Effect::ReleaseListeners(lease.kinds));
                self.lease = None;
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
