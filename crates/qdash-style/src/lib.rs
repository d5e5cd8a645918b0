#![forbid(unsafe_code)]

//! Computed box styles for qdash widgets.
//!
//! Widgets never emit raw CSS strings. They build a [`BoxStyle`] out of typed
//! [`Property`] / [`Value`] pairs and the host serializes it with
//! [`BoxStyle::to_css`].

pub mod box_style;
pub mod dimension;

pub use box_style::{BoxStyle, Position, Property, Value};
pub use dimension::Dimension;
