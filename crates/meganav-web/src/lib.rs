#![forbid(unsafe_code)]

//! `meganav-web` embeds the navigation in a host document.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page (JS glue) pushes DOM signals and
//!   performs the effects handed back to it.
//! - **One writer**: only the controller mutates navigation state; the router
//!   translates, the session sequences.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! This crate does not bind to `wasm-bindgen`. [`router::DomHost`] is the
//! seam a binding layer implements.

pub mod router;
pub mod session;

#[cfg(feature = "signal-parser")]
pub mod signal_parser;

#[cfg(feature = "tracing-json")]
pub mod logging;

pub use router::{DomHost, EventRouter, HostCall, ListenTarget, RecordingHost};
pub use session::{NavSession, SessionError, StepResult};
