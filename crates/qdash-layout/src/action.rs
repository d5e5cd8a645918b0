#![forbid(unsafe_code)]

//! Layout actions and dispatch.
//!
//! Every action the layout host raises passes through an
//! [`ActionDispatcher`] before the host applies it. Dashboard widgets never
//! intercept or veto layout actions, so the only dispatcher shipped here is
//! [`ForwardingDispatcher`].

use serde::{Deserialize, Serialize};

/// An action raised by the layout host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LayoutAction {
    SelectTab {
        tab_id: String,
    },
    SetWeight {
        node_id: String,
        weight: u32,
    },
    MoveTab {
        tab_id: String,
        to_tabset: String,
        index: usize,
    },
    DeleteTab {
        tab_id: String,
    },
    MaximizeTabSet {
        tabset_id: String,
    },
}

/// Hook between the layout host raising an action and applying it.
pub trait ActionDispatcher {
    /// Return the action the host should apply.
    fn dispatch(&mut self, action: LayoutAction) -> LayoutAction;
}

/// Passes every action through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardingDispatcher;

impl ActionDispatcher for ForwardingDispatcher {
    fn dispatch(&mut self, action: LayoutAction) -> LayoutAction {
        tracing::trace!(?action, "forwarding layout action");
        action
    }
}
