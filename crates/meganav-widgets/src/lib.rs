#![forbid(unsafe_code)]

//! `meganav-widgets` turns an authored nav fragment into a responsive
//! mega-menu.
//!
//! Pipeline:
//! - [`source`] splits the fragment into brand, sections, and tools.
//! - [`image_index`] pairs authored images with labels.
//! - [`classify`] parses the main menu into [`MenuItem`] trees and assigns
//!   each top-level entry an [`EntryShape`].
//! - [`mega_panel`] builds sections, third-level panels, and the node id
//!   directory into an immutable [`NavModel`].
//! - [`controller`] owns [`NavigationState`] and applies transitions.
//! - [`render`] derives markup from model plus state.
//!
//! Nothing here touches a live document or registers listeners; the effects
//! returned by the controller are carried out by the embedding host.

pub mod classify;
pub mod controller;
pub mod diagnostics;
pub mod image_index;
pub mod mega_panel;
pub mod render;
pub mod source;

pub use classify::{EntryShape, MenuItem, NavTree, classify};
pub use controller::{
    Effect, FocusTarget, NavigationState, ResponsiveController, Transition, TransitionOutcome,
};
pub use diagnostics::{Degradation, DegradationKind, Diagnostics};
pub use image_index::{ImageIndex, normalize_key};
pub use mega_panel::{
    HoverTarget, MegaPanel, MegaPanelBuilder, NavEntry, NavModel, PanelId, PanelTable, Section,
    SectionId, Target,
};
pub use render::{render_html, render_nav};
pub use source::NavFragment;
