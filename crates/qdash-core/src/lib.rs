#![forbid(unsafe_code)]

//! Core: host events, CSS lengths, margin configuration and logging.

pub mod config;
pub mod event;
pub mod length;
pub mod logging;

pub use config::{MarginConfig, Margins};
pub use event::{ControlId, Event};
pub use length::{BareNumber, CssLength, LengthParseError, LengthUnit};
