#![forbid(unsafe_code)]

//! Expansion State Machine for the query editor.
//!
//! The editor has two independent inputs:
//!
//! - the focus signal, transient, driven by focus/blur events and by the
//!   caller's optional `focused` input
//! - the `expandable` preference, persisted under
//!   [`EXPANDABLE_PREFERENCE_KEY`] through a [`PersistedPreference`]
//!
//! [`ExpansionState`] is never stored. Every accessor recomputes it from the
//! two inputs, so a toggle is visible on the very next read.
//!
//! | focused | expandable | state |
//! |---------|------------|-------|
//! | false | false | Collapsed |
//! | false | true  | Collapsed |
//! | true  | false | Collapsed |
//! | true  | true  | Expanded  |
//!
//! # Caller inputs
//!
//! `focused` and `show_tooltip` follow an adopt-on-change rule: the editor
//! remembers the last value the caller supplied and only overwrites its own
//! state when a different value arrives. Re-supplying the same value leaves
//! user-driven focus changes in place.

use std::fmt;

use qdash_core::{ControlId, CssLength, Event};
use qdash_runtime::{PersistedPreference, SharedStore};
use qdash_style::{BoxStyle, Dimension, Position, Property};

use crate::Invalidation;

/// Storage key of the expandable preference.
pub const EXPANDABLE_PREFERENCE_KEY: &str = "expandable";

/// Value of the preference when nothing is stored.
pub const DEFAULT_EXPANDABLE: bool = true;

const PLACEHOLDER: &str = "Type your query here...";
const FOCUSED_BORDER: &str = "2px solid #007bff";
const UNFOCUSED_BORDER: &str = "2px solid #ddd";

/// Derived visual mode of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpansionState {
    /// Bounded region anchored to the right of the container.
    Collapsed,
    /// Full-viewport overlay above all other content.
    Expanded,
}

impl ExpansionState {
    /// `Expanded` exactly when focused and expandable.
    #[must_use]
    pub const fn derive(focused: bool, expandable: bool) -> Self {
        if focused && expandable {
            Self::Expanded
        } else {
            Self::Collapsed
        }
    }

    /// Whether this is [`ExpansionState::Expanded`].
    #[must_use]
    pub const fn is_expanded(self) -> bool {
        matches!(self, Self::Expanded)
    }

    /// CSS class for the container.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Collapsed => "collapsed",
            Self::Expanded => "expanded",
        }
    }
}

impl fmt::Display for ExpansionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Collapsed => "Collapsed",
            Self::Expanded => "EXPANDED",
        })
    }
}

/// Focus observer callback.
pub type FocusObserver = Box<dyn FnMut(bool)>;

/// Focus-driven expandable query editor.
pub struct QueryEditor {
    focused: bool,
    focused_prop: Option<bool>,
    show_tooltip: bool,
    show_tooltip_prop: Option<bool>,
    expandable: PersistedPreference<bool>,
    on_focus_change: Option<FocusObserver>,
    class_name: Option<String>,
    style: BoxStyle,
    content: Option<String>,
}

impl QueryEditor {
    /// The expand/fixed toggle button.
    pub const EXPAND_TOGGLE: ControlId = ControlId::new("queryable-editor.toggle");
    /// The editable text region.
    pub const TEXT_REGION: ControlId = ControlId::new("queryable-editor.text");

    /// Mount an editor, reading the preference once from `store`.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self::with_preference(PersistedPreference::read(
            store,
            EXPANDABLE_PREFERENCE_KEY,
            DEFAULT_EXPANDABLE,
        ))
    }

    /// Mount an editor over an already-read preference.
    #[must_use]
    pub fn with_preference(expandable: PersistedPreference<bool>) -> Self {
        Self {
            focused: false,
            focused_prop: None,
            show_tooltip: false,
            show_tooltip_prop: None,
            expandable,
            on_focus_change: None,
            class_name: None,
            style: BoxStyle::new(),
            content: None,
        }
    }

    /// Supply the initial focus.
    #[must_use]
    pub fn with_focused(mut self, focused: bool) -> Self {
        self.set_focused_prop(Some(focused));
        self
    }

    /// Supply the initial tooltip visibility.
    #[must_use]
    pub fn with_show_tooltip(mut self, show: bool) -> Self {
        self.set_show_tooltip_prop(Some(show));
        self
    }

    /// Register the focus observer.
    #[must_use]
    pub fn with_on_focus_change(mut self, observer: impl FnMut(bool) + 'static) -> Self {
        self.on_focus_change = Some(Box::new(observer));
        self
    }

    /// Extra class appended to the container's class list.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Caller style, applied over the base style and under the state
    /// overrides.
    #[must_use]
    pub fn with_style(mut self, style: BoxStyle) -> Self {
        self.style = style;
        self
    }

    /// Query text shown in the text region.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    // ─── Caller inputs ───────────────────────────────────────────────

    /// Re-supply the caller's `focused` input.
    ///
    /// Adopted only when it differs from the previously supplied value;
    /// `None` counts as `false`. The observer is not called: the caller
    /// already knows the value it supplied.
    pub fn set_focused_prop(&mut self, focused: Option<bool>) -> Invalidation {
        if self.focused_prop == focused {
            return Invalidation::empty();
        }
        self.focused_prop = focused;
        let next = focused.unwrap_or(false);
        tracing::trace!(focused = next, "editor adopted caller focus");
        if self.focused == next {
            return Invalidation::empty();
        }
        self.focused = next;
        Invalidation::FOCUS
    }

    /// Re-supply the caller's `show_tooltip` input.
    pub fn set_show_tooltip_prop(&mut self, show: Option<bool>) -> Invalidation {
        if self.show_tooltip_prop == show {
            return Invalidation::empty();
        }
        self.show_tooltip_prop = show;
        let next = show.unwrap_or(false);
        if self.show_tooltip == next {
            return Invalidation::empty();
        }
        self.show_tooltip = next;
        Invalidation::TOOLTIP
    }

    // ─── Transitions ─────────────────────────────────────────────────

    /// The input region gained focus.
    pub fn on_focus(&mut self) -> Invalidation {
        self.set_focus(true)
    }

    /// The input region lost focus.
    pub fn on_blur(&mut self) -> Invalidation {
        self.set_focus(false)
    }

    fn set_focus(&mut self, focused: bool) -> Invalidation {
        let changed = self.focused != focused;
        self.focused = focused;
        tracing::trace!(focused, state = %self.expansion(), "editor focus changed");
        if let Some(observer) = self.on_focus_change.as_mut() {
            observer(focused);
        }
        if changed {
            Invalidation::FOCUS
        } else {
            Invalidation::empty()
        }
    }

    /// Flip the persisted preference. Does not notify the focus observer.
    pub fn toggle_expandable(&mut self) -> Invalidation {
        let expandable = self.expandable.toggle();
        tracing::debug!(
            expandable,
            durable = self.expandable.is_durable(),
            state = %self.expansion(),
            "expandable preference toggled"
        );
        Invalidation::PREFERENCE
    }

    /// Route a host event.
    pub fn handle_event(&mut self, event: &Event) -> Invalidation {
        match event {
            Event::Focus(true) => self.on_focus(),
            Event::Focus(false) => self.on_blur(),
            Event::Click(control) if *control == Self::EXPAND_TOGGLE => self.toggle_expandable(),
            Event::Input { control, value } if *control == Self::TEXT_REGION => {
                self.content = Some(value.clone());
                Invalidation::empty()
            }
            _ => Invalidation::empty(),
        }
    }

    // ─── Derived state ───────────────────────────────────────────────

    /// Current focus signal.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Current preference value.
    #[must_use]
    pub fn is_expandable(&self) -> bool {
        self.expandable.get()
    }

    /// Whether the tooltip is shown.
    #[must_use]
    pub fn tooltip_visible(&self) -> bool {
        self.show_tooltip
    }

    /// The underlying preference.
    #[must_use]
    pub fn preference(&self) -> &PersistedPreference<bool> {
        &self.expandable
    }

    /// Expansion state derived from the current inputs.
    #[must_use]
    pub fn expansion(&self) -> ExpansionState {
        ExpansionState::derive(self.focused, self.expandable.get())
    }

    /// Whether the editor is expanded right now.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expansion().is_expanded()
    }

    /// `"Status: Focused | Expandable | EXPANDED"` and friends.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!(
            "Status: {} | {} | {}",
            if self.focused { "Focused" } else { "Unfocused" },
            if self.is_expandable() { "Expandable" } else { "Fixed Position" },
            self.expansion()
        )
    }

    /// Snapshot everything a renderer needs.
    #[must_use]
    pub fn view(&self) -> EditorView {
        let state = self.expansion();
        let expandable = self.is_expandable();
        EditorView {
            state,
            class_name: self.class_list(state),
            container_style: self.container_style(state),
            content_style: content_style(state),
            text_style: self.text_style(state),
            toggle: ToggleView::for_preference(expandable),
            tooltip: self.show_tooltip.then_some(match state {
                ExpansionState::Expanded => "Editor expanded (focus + expandable)",
                ExpansionState::Collapsed => "Editor collapsed",
            }),
            status: self.status_line(),
            text: self.content.clone().unwrap_or_else(|| PLACEHOLDER.to_owned()),
        }
    }

    fn class_list(&self, state: ExpansionState) -> String {
        let mut classes = format!("queryable-editor {}", state.class_name());
        if let Some(extra) = self.class_name.as_deref().filter(|c| !c.is_empty()) {
            classes.push(' ');
            classes.push_str(extra);
        }
        classes
    }

    fn container_style(&self, state: ExpansionState) -> BoxStyle {
        let base = BoxStyle::new()
            .with(Property::Position, Position::Relative)
            .with(Property::Transition, "all 0.3s ease-in-out");
        let overrides = match state {
            ExpansionState::Expanded => BoxStyle::new()
                .with(Property::Position, Position::Fixed)
                .with(Property::Top, CssLength::ZERO)
                .with(Property::Left, CssLength::ZERO)
                .with(Property::Right, CssLength::ZERO)
                .with(Property::Bottom, CssLength::ZERO)
                .with(Property::ZIndex, 1000)
                .with(Property::BackgroundColor, "white")
                .with(Property::BoxShadow, "0 4px 20px rgba(0, 0, 0, 0.15)"),
            ExpansionState::Collapsed => BoxStyle::new()
                .with(Property::Position, Position::Relative)
                .with(Property::Display, "flex")
                .with(Property::JustifyContent, "flex-end")
                .with(Property::AlignItems, "flex-start"),
        };
        base.merged(&self.style).merged(&overrides)
    }

    fn text_style(&self, state: ExpansionState) -> BoxStyle {
        let height = match state {
            ExpansionState::Expanded => {
                Dimension::minus(CssLength::percent(100.0), CssLength::px(60.0))
            }
            ExpansionState::Collapsed => Dimension::Length(CssLength::px(300.0)),
        };
        BoxStyle::new()
            .with(Property::Width, CssLength::percent(100.0))
            .with(Property::Height, height)
            .with(
                Property::Border,
                if self.focused { FOCUSED_BORDER } else { UNFOCUSED_BORDER },
            )
            .with(Property::BorderRadius, CssLength::px(4.0))
            .with(Property::Padding, CssLength::px(16.0))
            .with(Property::BackgroundColor, "#fafafa")
            .with(Property::FontFamily, "monospace")
            .with(Property::FontSize, CssLength::px(14.0))
            .with(Property::Overflow, "auto")
    }
}

fn content_style(state: ExpansionState) -> BoxStyle {
    match state {
        ExpansionState::Expanded => BoxStyle::new()
            .with(Property::Width, CssLength::percent(100.0))
            .with(Property::Height, CssLength::percent(100.0))
            .with(Property::Padding, CssLength::px(20.0)),
        ExpansionState::Collapsed => BoxStyle::new()
            .with(Property::MaxWidth, CssLength::percent(50.0))
            .with(Property::MinWidth, CssLength::px(300.0)),
    }
}

impl fmt::Debug for QueryEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryEditor")
            .field("focused", &self.focused)
            .field("focused_prop", &self.focused_prop)
            .field("show_tooltip", &self.show_tooltip)
            .field("expandable", &self.expandable)
            .field("has_observer", &self.on_focus_change.is_some())
            .field("class_name", &self.class_name)
            .finish_non_exhaustive()
    }
}

/// Presentation of the expand/fixed toggle button.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleView {
    /// `"Expandable"` or `"Fixed"`.
    pub label: &'static str,
    /// Hover text describing what a click does.
    pub title: &'static str,
    /// Highlighted when the preference is on.
    pub active: bool,
    /// Button style.
    pub style: BoxStyle,
}

impl ToggleView {
    fn for_preference(expandable: bool) -> Self {
        let (background, color) = if expandable {
            ("#007bff", "white")
        } else {
            ("#f8f9fa", "#333")
        };
        Self {
            label: if expandable { "Expandable" } else { "Fixed" },
            title: if expandable {
                "Disable expansion"
            } else {
                "Enable expansion"
            },
            active: expandable,
            style: BoxStyle::new()
                .with(Property::Padding, "4px 8px")
                .with(Property::Border, "1px solid #ccc")
                .with(Property::BorderRadius, CssLength::px(4.0))
                .with(Property::BackgroundColor, background)
                .with(Property::Color, color)
                .with(Property::Cursor, "pointer")
                .with(Property::FontSize, CssLength::px(12.0)),
        }
    }
}

/// Render snapshot of a [`QueryEditor`].
#[derive(Debug, Clone, PartialEq)]
pub struct EditorView {
    /// Derived expansion state.
    pub state: ExpansionState,
    /// Container class list.
    pub class_name: String,
    /// Container style: base, then caller style, then state overrides.
    pub container_style: BoxStyle,
    /// Style of the box around the text region and status line.
    pub content_style: BoxStyle,
    /// Style of the editable text region.
    pub text_style: BoxStyle,
    /// The expand/fixed toggle.
    pub toggle: ToggleView,
    /// Tooltip text, when the tooltip is shown.
    pub tooltip: Option<&'static str>,
    /// Status line.
    pub status: String,
    /// Query text, or the placeholder.
    pub text: String,
}
