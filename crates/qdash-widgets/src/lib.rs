#![forbid(unsafe_code)]

//! Stateful widgets for the qdash analytical dashboard.
//!
//! # Key Components
//!
//! - [`QueryEditor`] - focus-driven expandable query editor backed by a
//!   persisted `expandable` preference
//! - [`validate_height`] - free-text height validator producing [`HeightSpec`]
//! - [`SaveDialog`] - fixed-height / full-viewport choice emitting a
//!   [`SaveEvent`]
//! - [`DashboardContainer`] / [`Dashboard`] - consume saved heights and
//!   compute the dashboard's box model around an opaque layout tree
//!
//! Widgets hold state only. A host feeds them [`qdash_core::Event`]s through
//! `handle_event`, reads back the returned [`Invalidation`] and re-renders
//! from the widget's view accessors.

pub mod dashboard;
pub mod height;
pub mod query_editor;
pub mod save_dialog;

pub use dashboard::{Dashboard, DashboardContainer, DashboardPanels, Panel, SAVE_BUTTON};
pub use height::{HEIGHT_UNITS, HeightSpec, InvalidHeight, validate_height};
pub use query_editor::{
    DEFAULT_EXPANDABLE, EXPANDABLE_PREFERENCE_KEY, EditorView, ExpansionState, QueryEditor,
    ToggleView,
};
pub use save_dialog::{DEFAULT_HEIGHT_TEXT, DialogOutcome, SaveDialog, SaveEvent};

use bitflags::bitflags;

bitflags! {
    /// What a handled event changed, so the host knows what to re-render.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Invalidation: u8 {
        /// Focus signal changed.
        const FOCUS      = 0b0000_0001;
        /// A persisted preference changed.
        const PREFERENCE = 0b0000_0010;
        /// Tooltip visibility changed.
        const TOOLTIP    = 0b0000_0100;
        /// Dialog state (open, fields, error) changed.
        const DIALOG     = 0b0000_1000;
        /// Computed container dimensions changed.
        const DIMENSIONS = 0b0001_0000;
        /// The layout tree changed (selection or weights).
        const LAYOUT     = 0b0010_0000;
    }
}
