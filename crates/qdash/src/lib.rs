#![forbid(unsafe_code)]

//! qdash public facade crate.
//!
//! Re-exports the widget, style, layout and preference types a host needs
//! to drive the dashboard, plus the [`cli`] and [`commands`] modules behind
//! the `qdash` inspection binary.

use std::fmt;

pub mod cli;
pub mod commands;

// --- Core re-exports -------------------------------------------------------

pub use qdash_core::{
    BareNumber, ControlId, CssLength, Event, LengthParseError, LengthUnit, MarginConfig, Margins,
};
pub use qdash_core::logging::{LogConfig, LogFormat, LoggingError};

// --- Style re-exports ------------------------------------------------------

pub use qdash_style::{BoxStyle, Dimension, Position, Property, Value};

// --- Layout re-exports -----------------------------------------------------

pub use qdash_layout::{
    ActionDispatcher, DashboardLayoutModel, ForwardingDispatcher, LayoutAction, LayoutModelError,
    PanelFactory, TabDescriptor,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "state-persistence")]
pub use qdash_runtime::FileStore;
pub use qdash_runtime::{
    KeyValueStore, MemoryStore, PersistedPreference, PreferenceValue, SharedStore, StorageError,
    UnavailableStore,
};

// --- Widget re-exports -----------------------------------------------------

pub use qdash_widgets::{
    Dashboard, DashboardContainer, DashboardPanels, DialogOutcome, EXPANDABLE_PREFERENCE_KEY,
    ExpansionState, HeightSpec, InvalidHeight, Invalidation, Panel, QueryEditor, SaveDialog,
    SaveEvent, validate_height,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for qdash tools.
#[derive(Debug)]
pub enum Error {
    /// I/O failure writing output.
    Io(std::io::Error),
    /// The preference store could not be read or written.
    Storage(StorageError),
    /// A height the validator rejected.
    InvalidHeight(InvalidHeight),
    /// Bad command-line usage.
    Usage(String),
}

impl Error {
    /// Process exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidHeight(_) => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::InvalidHeight(err) => write!(f, "{err}"),
            Self::Usage(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::InvalidHeight(err) => Some(err),
            Self::Usage(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<InvalidHeight> for Error {
    fn from(err: InvalidHeight) -> Self {
        Self::InvalidHeight(err)
    }
}

/// Standard result type for qdash tools.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BoxStyle, CssLength, Dashboard, DashboardContainer, Error, Event, ExpansionState,
        HeightSpec, Invalidation, MarginConfig, MemoryStore, QueryEditor, Result, SaveDialog,
        SharedStore, validate_height,
    };

    pub use crate::{core, layout, runtime, style, widgets};
}

pub use qdash_core as core;
pub use qdash_layout as layout;
pub use qdash_runtime as runtime;
pub use qdash_style as style;
pub use qdash_widgets as widgets;
