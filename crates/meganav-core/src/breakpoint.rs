#![forbid(unsafe_code)]

//! Breakpoint detection.
//!
//! The controller never reads a global viewport. It is handed a
//! [`BreakpointObserver`] at construction and afterwards receives discrete
//! breakpoint changes. [`MediaQueryObserver`] models a `(min-width: Npx)`
//! media query fed with viewport widths by the host; it reports a change only
//! when the width crosses the threshold.

/// Interaction layout selected by viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breakpoint {
    /// Wide viewport: horizontal bar with hover/click dropdowns.
    Desktop,
    /// Narrow viewport: hamburger-controlled collapsible nav.
    Mobile,
}

impl Breakpoint {
    /// Whether this is [`Breakpoint::Desktop`].
    #[must_use]
    pub const fn is_desktop(self) -> bool {
        matches!(self, Self::Desktop)
    }

    /// Map a media-query `matches` flag.
    #[must_use]
    pub const fn from_desktop_match(matches: bool) -> Self {
        if matches { Self::Desktop } else { Self::Mobile }
    }
}

/// Source of the live breakpoint.
pub trait BreakpointObserver {
    /// The breakpoint right now.
    fn current(&self) -> Breakpoint;
}

/// Observer pinned to a single breakpoint (tests, headless rendering).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBreakpoint(pub Breakpoint);

impl BreakpointObserver for FixedBreakpoint {
    fn current(&self) -> Breakpoint {
        self.0
    }
}

/// `(min-width: N px)` media query driven by host width updates.
#[derive(Debug, Clone)]
pub struct MediaQueryObserver {
    min_width: u32,
    current: Breakpoint,
    changes: u64,
}

impl MediaQueryObserver {
    /// Create an observer for `min_width` with the viewport's initial width.
    #[must_use]
    pub fn new(min_width: u32, initial_width: u32) -> Self {
        Self {
            min_width,
            current: Self::classify(min_width, initial_width),
            changes: 0,
        }
    }

    fn classify(min_width: u32, width: u32) -> Breakpoint {
        Breakpoint::from_desktop_match(width >= min_width)
    }

    /// Feed a new viewport width; returns the new breakpoint if it crossed.
    pub fn update_width(&mut self, width: u32) -> Option<Breakpoint> {
        self.update(Self::classify(self.min_width, width))
    }

    /// Feed a media query `matches` flag; returns the new breakpoint if changed.
    pub fn update_match(&mut self, desktop: bool) -> Option<Breakpoint> {
        self.update(Breakpoint::from_desktop_match(desktop))
    }

    fn update(&mut self, next: Breakpoint) -> Option<Breakpoint> {
        if next == self.current {
            return None;
        }
        self.current = next;
        self.changes += 1;
        Some(next)
    }

    /// Threshold width in CSS pixels.
    #[inline]
    #[must_use]
    pub fn min_width(&self) -> u32 {
        self.min_width
    }

    /// Number of reported crossings (diagnostic).
    #[inline]
    #[must_use]
    pub fn change_count(&self) -> u64 {
        self.changes
    }
}

impl BreakpointObserver for MediaQueryObserver {
    fn current(&self) -> Breakpoint {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_width_selects_breakpoint() {
        assert_eq!(MediaQueryObserver::new(900, 1200).current(), Breakpoint::Desktop);
        assert_eq!(MediaQueryObserver::new(900, 900).current(), Breakpoint::Desktop);
        assert_eq!(MediaQueryObserver::new(900, 899).current(), Breakpoint::Mobile);
    }

    #[test]
    fn only_crossings_are_reported() {
        let mut obs = MediaQueryObserver::new(900, 1200);
        assert_eq!(obs.update_width(1000), None);
        assert_eq!(obs.update_width(600), Some(Breakpoint::Mobile));
        assert_eq!(obs.update_width(500), None);
        assert_eq!(obs.update_match(true), Some(Breakpoint::Desktop));
        assert_eq!(obs.update_match(true), None);
        assert_eq!(obs.change_count(), 2);
    }

    #[test]
    fn fixed_observer() {
        assert_eq!(FixedBreakpoint(Breakpoint::Mobile).current(), Breakpoint::Mobile);
        assert!(Breakpoint::Desktop.is_desktop());
    }
}
