#![forbid(unsafe_code)]

//! Core: fragment model, host signals, breakpoints, and configuration.

pub mod breakpoint;
pub mod config;
pub mod event;
pub mod fragment;

pub use breakpoint::{Breakpoint, BreakpointObserver, FixedBreakpoint, MediaQueryObserver};
pub use config::{ConfigError, NavConfig};
pub use event::{KeyCode, ListenerSet, NavSignal};
pub use fragment::{Element, Node};
