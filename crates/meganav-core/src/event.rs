#![forbid(unsafe_code)]

//! DOM-level signal types delivered by the host.
//!
//! The host (page shell or JS glue) observes real DOM events and forwards
//! them as [`NavSignal`] values. Targets are identified by the
//! `data-nav-id` attribute the renderer stamps on every interactive element,
//! so the core never holds references into the live document. For events on
//! unstamped descendants (an anchor inside a stamped `li`) the host reports
//! the nearest stamped ancestor, the way `Element.closest("[data-nav-id]")`
//! resolves it.
//!
//! # Design Notes
//!
//! - Pointer signals may carry the layout epoch the host read from the nav
//!   root (`data-nav-epoch`) when the event fired. When absent, the session
//!   stamps the epoch that was current at enqueue time.
//! - [`ListenerSet`] names the listener kinds a binding covers; the router and
//!   the controller's dismiss lease speak in these flags.

use bitflags::bitflags;

/// A signal forwarded from the host's DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavSignal {
    /// Pointer entered an element (`mouseenter`).
    PointerEnter {
        /// `data-nav-id` of the entered element.
        target: String,
        /// Layout epoch observed by the host, if known.
        epoch: Option<u64>,
    },

    /// Pointer left an element (`mouseleave`).
    PointerLeave {
        /// `data-nav-id` of the element that was left.
        target: String,
        /// Layout epoch observed by the host, if known.
        epoch: Option<u64>,
    },

    /// Primary click on an element.
    Click {
        /// `data-nav-id` of the clicked element.
        target: String,
    },

    /// A key was pressed.
    ///
    /// `target` is the focused element, or `None` when the key arrived at the
    /// window-level listener.
    KeyDown {
        /// `data-nav-id` of the focused element.
        target: Option<String>,
        /// The key pressed.
        key: KeyCode,
    },

    /// Focus left an element inside the nav.
    FocusOut {
        /// `data-nav-id` of the element receiving focus, if any.
        related_target: Option<String>,
    },

    /// The desktop media query changed its `matches` state.
    MediaChange {
        /// Whether the desktop query now matches.
        desktop: bool,
    },

    /// The viewport was resized.
    Resize {
        /// New viewport width in CSS pixels.
        width: u32,
    },
}

impl NavSignal {
    /// Whether this is a pointer hover signal subject to epoch checks.
    #[must_use]
    pub const fn is_hover(&self) -> bool {
        matches!(self, Self::PointerEnter { .. } | Self::PointerLeave { .. })
    }

    /// Short name for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PointerEnter { .. } => "pointerenter",
            Self::PointerLeave { .. } => "pointerleave",
            Self::Click { .. } => "click",
            Self::KeyDown { .. } => "keydown",
            Self::FocusOut { .. } => "focusout",
            Self::MediaChange { .. } => "mediachange",
            Self::Resize { .. } => "resize",
        }
    }
}

/// Keys the navigation reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Enter/Return.
    Enter,
    /// Space bar.
    Space,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// Any other printable key.
    Char(char),
    /// A key the navigation does not distinguish.
    Other,
}

impl KeyCode {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            " " | "Spacebar" | "Space" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other,
                }
            }
        }
    }

    /// Whether this key activates a focused drop trigger.
    #[must_use]
    pub const fn is_activation(&self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

bitflags! {
    /// Listener kinds attached to a DOM target.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ListenerSet: u8 {
        /// `mouseenter`.
        const POINTER_ENTER = 0b0000_0001;
        /// `mouseleave`.
        const POINTER_LEAVE = 0b0000_0010;
        /// `click`.
        const CLICK = 0b0000_0100;
        /// `keydown` on a focusable trigger (Enter/Space activation).
        const KEYDOWN = 0b0000_1000;
        /// Window-level `keydown` watching for Escape.
        const ESCAPE = 0b0001_0000;
        /// `focusout` on the nav root.
        const FOCUS_OUT = 0b0010_0000;
        /// Media query `change`.
        const MEDIA_CHANGE = 0b0100_0000;

        /// Both pointer hover kinds.
        const HOVER = Self::POINTER_ENTER.bits() | Self::POINTER_LEAVE.bits();
        /// Listeners held only while something is open.
        const DISMISS = Self::ESCAPE.bits() | Self::FOCUS_OUT.bits();
    }
}
