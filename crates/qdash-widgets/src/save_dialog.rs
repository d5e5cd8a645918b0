#![forbid(unsafe_code)]

//! Save-dashboard dialog: the producer side of dimension negotiation.
//!
//! The dialog offers two mutually exclusive choices. With "use fixed height"
//! checked, [`SaveDialog::confirm`] runs the height text through
//! [`validate_height`] and only emits a [`SaveEvent`] on success; a rejection
//! is kept on the dialog, which stays open. Unchecked, confirming always
//! emits [`HeightSpec::Unset`].
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Fixed height, text rejected | `Err(InvalidHeight)`, error shown, dialog stays open |
//! | Fixed height, text edited after a rejection | Error cleared |
//! | Full viewport, any text | `Ok(Unset)`, text ignored |

use qdash_core::{ControlId, Event};

use crate::Invalidation;
use crate::height::{HeightSpec, InvalidHeight, validate_height};

/// Height text offered when no override is active.
pub const DEFAULT_HEIGHT_TEXT: &str = "800px";

/// A confirmed save.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaveEvent {
    /// The validated height choice.
    pub height: HeightSpec,
}

/// Result of routing an event to the dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogOutcome {
    /// Still open. Carries what changed.
    Open(Invalidation),
    /// Confirmed with a valid choice; the dialog should close.
    Saved(SaveEvent),
    /// Cancelled or the overlay was clicked.
    Dismissed,
}

/// Save-dashboard dialog state.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveDialog {
    use_fixed_height: bool,
    height_text: String,
    error: Option<InvalidHeight>,
}

impl SaveDialog {
    /// "Use fixed height instead of full screen" checkbox.
    pub const USE_FIXED_HEIGHT: ControlId = ControlId::new("save-dialog.use-fixed-height");
    /// Height text input.
    pub const HEIGHT_INPUT: ControlId = ControlId::new("save-dialog.height");
    /// Primary "Save Dashboard" button.
    pub const SAVE: ControlId = ControlId::new("save-dialog.save");
    /// "Cancel" button.
    pub const CANCEL: ControlId = ControlId::new("save-dialog.cancel");
    /// The dimmed area around the dialog.
    pub const OVERLAY: ControlId = ControlId::new("save-dialog.overlay");

    /// Dialog title.
    pub const TITLE: &'static str = "Save Dashboard";

    /// Open the dialog reflecting the current override.
    ///
    /// An active fixed height pre-selects "fixed" and pre-fills its value.
    #[must_use]
    pub fn open_for(current: &HeightSpec) -> Self {
        let (use_fixed_height, height_text) = match current {
            HeightSpec::Fixed(length) => (true, length.to_string()),
            HeightSpec::Unset => (false, DEFAULT_HEIGHT_TEXT.to_owned()),
        };
        Self {
            use_fixed_height,
            height_text,
            error: None,
        }
    }

    /// Whether "use fixed height" is checked.
    #[must_use]
    pub fn use_fixed_height(&self) -> bool {
        self.use_fixed_height
    }

    /// Current height text, unvalidated.
    #[must_use]
    pub fn height_text(&self) -> &str {
        &self.height_text
    }

    /// The rejection from the last confirm, if still relevant.
    #[must_use]
    pub fn error(&self) -> Option<&InvalidHeight> {
        self.error.as_ref()
    }

    /// Whether the height field is shown.
    #[must_use]
    pub fn shows_height_input(&self) -> bool {
        self.use_fixed_height
    }

    /// Help text under the checkbox.
    #[must_use]
    pub fn help_text(&self) -> &'static str {
        if self.use_fixed_height {
            "Dashboard will have a fixed height and may scroll if content is larger"
        } else {
            "Dashboard will occupy the full viewport height (default behavior)"
        }
    }

    /// Check or uncheck "use fixed height".
    pub fn set_use_fixed_height(&mut self, checked: bool) -> Invalidation {
        if self.use_fixed_height == checked {
            return Invalidation::empty();
        }
        self.use_fixed_height = checked;
        self.error = None;
        Invalidation::DIALOG
    }

    /// Replace the height text.
    pub fn set_height_text(&mut self, text: impl Into<String>) -> Invalidation {
        let text = text.into();
        if self.height_text == text {
            return Invalidation::empty();
        }
        self.height_text = text;
        self.error = None;
        Invalidation::DIALOG
    }

    /// Try to save.
    ///
    /// On rejection the error is also stored on the dialog so the host can
    /// keep showing it.
    pub fn confirm(&mut self) -> Result<SaveEvent, InvalidHeight> {
        if !self.use_fixed_height {
            tracing::debug!("dashboard saved with full viewport height");
            self.error = None;
            return Ok(SaveEvent {
                height: HeightSpec::Unset,
            });
        }
        match validate_height(&self.height_text) {
            Ok(height) => {
                tracing::debug!(%height, "dashboard saved with fixed height");
                self.error = None;
                Ok(SaveEvent { height })
            }
            Err(error) => {
                tracing::debug!(input = error.input(), "height rejected, dialog stays open");
                self.error = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Route a host event.
    pub fn handle_event(&mut self, event: &Event) -> DialogOutcome {
        match event {
            Event::Check { control, checked } if *control == Self::USE_FIXED_HEIGHT => {
                DialogOutcome::Open(self.set_use_fixed_height(*checked))
            }
            Event::Input { control, value } if *control == Self::HEIGHT_INPUT => {
                DialogOutcome::Open(self.set_height_text(value.as_str()))
            }
            Event::Click(control) if *control == Self::SAVE => match self.confirm() {
                Ok(save) => DialogOutcome::Saved(save),
                Err(_) => DialogOutcome::Open(Invalidation::DIALOG),
            },
            Event::Click(control) if *control == Self::CANCEL || *control == Self::OVERLAY => {
                DialogOutcome::Dismissed
            }
            _ => DialogOutcome::Open(Invalidation::empty()),
        }
    }
}
