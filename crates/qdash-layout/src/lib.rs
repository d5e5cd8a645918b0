#![forbid(unsafe_code)]

//! Dashboard layout model and the layout-host seam.
//!
//! The panel tree (rows, tabsets, tabs) belongs to an external layout engine.
//! This crate only carries enough of it to:
//!
//! - enumerate the visible tabs and hand each to a [`PanelFactory`],
//! - forward [`LayoutAction`]s unmodified through an [`ActionDispatcher`],
//! - prove that sizing the dashboard container never touches split weights.

pub mod action;
pub mod model;

pub use action::{ActionDispatcher, ForwardingDispatcher, LayoutAction};
pub use model::{
    DashboardLayoutModel, LayoutModelError, LayoutNode, PanelFactory, RowNode, TabDescriptor,
    TabSetNode,
};
