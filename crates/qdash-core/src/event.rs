#![forbid(unsafe_code)]

//! Host-delivered UI events.
//!
//! The embedding host (browser shim, terminal front-end, test harness)
//! translates its native events into [`Event`] values and hands them to a
//! widget's `handle_event`. Every handler runs to completion before the next
//! event is delivered; there is no suspension inside a transition.

use std::fmt;

/// Stable identifier for an interactive control inside a widget.
///
/// Widgets publish their control ids as associated constants so hosts can
/// route clicks and input without string matching at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(&'static str);

impl ControlId {
    /// Create a control id.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The id's name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Canonical UI event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Focus gained or lost by the target's input region.
    ///
    /// `true` = focus gained, `false` = focus lost.
    Focus(bool),

    /// A button-like control was activated.
    Click(ControlId),

    /// The text of an input control changed.
    Input {
        /// Control whose value changed.
        control: ControlId,
        /// Full new value (not a delta).
        value: String,
    },

    /// A checkbox-like control changed.
    Check {
        /// Control whose state changed.
        control: ControlId,
        /// New checked state.
        checked: bool,
    },
}

impl Event {
    /// Convenience constructor for [`Event::Input`].
    #[must_use]
    pub fn input(control: ControlId, value: impl Into<String>) -> Self {
        Self::Input {
            control,
            value: value.into(),
        }
    }

    /// Convenience constructor for [`Event::Check`].
    #[must_use]
    pub const fn check(control: ControlId, checked: bool) -> Self {
        Self::Check { control, checked }
    }

    /// The control this event targets, if any.
    #[must_use]
    pub fn control(&self) -> Option<ControlId> {
        match self {
            Self::Focus(_) => None,
            Self::Click(control) => Some(*control),
            Self::Input { control, .. } | Self::Check { control, .. } => Some(*control),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAVE: ControlId = ControlId::new("save");

    #[test]
    fn control_routing() {
        assert_eq!(Event::Focus(true).control(), None);
        assert_eq!(Event::Click(SAVE).control(), Some(SAVE));
        assert_eq!(Event::input(SAVE, "x").control(), Some(SAVE));
        assert_eq!(Event::check(SAVE, true).control(), Some(SAVE));
    }

    #[test]
    fn control_id_display() {
        assert_eq!(SAVE.to_string(), "save");
        assert_eq!(SAVE.name(), "save");
    }
}
