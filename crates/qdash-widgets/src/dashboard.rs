#![forbid(unsafe_code)]

//! Dashboard container: the consumer side of dimension negotiation.
//!
//! [`DashboardContainer`] owns the session's [`HeightSpec`] and the resolved
//! [`Margins`], and computes the container box:
//!
//! | Height override | `height` | `width` |
//! |-----------------|----------|---------|
//! | `Fixed(len)` | `len` | `calc(100vw - right)` |
//! | `Unset` | `calc(100vh - top)` | `calc(100vw - right)` |
//!
//! [`Dashboard`] wires the container, the save dialog and the opaque layout
//! tree together. Saving never touches the tree's weights.

use std::rc::Rc;

use qdash_core::{ControlId, CssLength, Event, Margins};
use qdash_layout::{
    ActionDispatcher, DashboardLayoutModel, ForwardingDispatcher, LayoutAction, PanelFactory,
    TabDescriptor,
};
use qdash_runtime::{PersistedPreference, SharedStore};
use qdash_style::{BoxStyle, Dimension, Position, Property};

use crate::Invalidation;
use crate::height::HeightSpec;
use crate::query_editor::{DEFAULT_EXPANDABLE, EXPANDABLE_PREFERENCE_KEY, QueryEditor};
use crate::save_dialog::{DialogOutcome, SaveDialog, SaveEvent};

// ─── Container ───────────────────────────────────────────────────────

/// Box that hosts the layout tree and honours the saved height.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardContainer {
    margins: Margins,
    height: HeightSpec,
}

impl DashboardContainer {
    /// Create a container with no height override.
    #[must_use]
    pub fn new(margins: Margins) -> Self {
        Self {
            margins,
            height: HeightSpec::Unset,
        }
    }

    /// Resolved margins.
    #[must_use]
    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Current height override.
    #[must_use]
    pub fn height(&self) -> HeightSpec {
        self.height
    }

    /// Adopt a confirmed save.
    pub fn apply(&mut self, save: &SaveEvent) -> Invalidation {
        if self.height == save.height {
            return Invalidation::empty();
        }
        tracing::debug!(from = %self.height, to = %save.height, "dashboard height changed");
        self.height = save.height;
        Invalidation::DIMENSIONS
    }

    /// Box height: the fixed length, else full viewport minus the top margin.
    #[must_use]
    pub fn computed_height(&self) -> Dimension {
        match self.height {
            HeightSpec::Fixed(length) => Dimension::Length(length),
            HeightSpec::Unset => Dimension::minus(CssLength::vh(100.0), self.margins.top),
        }
    }

    /// Box width: full viewport minus the right margin.
    #[must_use]
    pub fn computed_width(&self) -> Dimension {
        Dimension::minus(CssLength::vw(100.0), self.margins.right)
    }

    /// Container style.
    #[must_use]
    pub fn style(&self) -> BoxStyle {
        BoxStyle::new()
            .with(Property::Position, Position::Relative)
            .with(Property::Width, self.computed_width())
            .with(Property::Height, self.computed_height())
    }
}

// ─── Panels ──────────────────────────────────────────────────────────

/// Content produced for one visible tab.
#[derive(Debug)]
pub enum Panel {
    /// Chart placeholder titled with the tab name.
    Chart { title: String },
    /// A query editor.
    Editor(Box<QueryEditor>),
    /// A component this dashboard does not know.
    Unknown { component: String },
}

impl Panel {
    /// Short text a renderer can show for the panel.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Chart { title } => format!("{title}: Chart component placeholder"),
            Self::Editor(editor) => editor.status_line(),
            Self::Unknown { component } => format!("Unknown component: {component}"),
        }
    }
}

/// Panel factory for the `"chart"` and `"editor"` components.
///
/// Every editor reads the `expandable` preference from the same store.
#[derive(Clone)]
pub struct DashboardPanels {
    store: SharedStore,
    on_editor_focus: Option<Rc<dyn Fn(&str, bool)>>,
}

impl DashboardPanels {
    /// Factory whose editors persist to `store`.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            on_editor_focus: None,
        }
    }

    /// Observe focus changes of every editor, keyed by tab id.
    #[must_use]
    pub fn with_editor_focus_observer(mut self, observer: impl Fn(&str, bool) + 'static) -> Self {
        self.on_editor_focus = Some(Rc::new(observer));
        self
    }
}

impl PanelFactory for DashboardPanels {
    type Panel = Panel;

    fn create(&mut self, tab: &TabDescriptor) -> Panel {
        match tab.component.as_str() {
            "chart" => Panel::Chart {
                title: tab.name.clone(),
            },
            "editor" => {
                let preference = PersistedPreference::read(
                    self.store.clone(),
                    EXPANDABLE_PREFERENCE_KEY,
                    DEFAULT_EXPANDABLE,
                );
                let mut editor = QueryEditor::with_preference(preference);
                if let Some(observer) = &self.on_editor_focus {
                    let observer = Rc::clone(observer);
                    let tab_id = tab.id.clone();
                    editor = editor.with_on_focus_change(move |focused| (*observer)(&tab_id, focused));
                }
                Panel::Editor(Box::new(editor))
            }
            other => {
                tracing::debug!(component = other, tab = %tab.id, "no panel for component");
                Panel::Unknown {
                    component: other.to_owned(),
                }
            }
        }
    }
}

impl std::fmt::Debug for DashboardPanels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardPanels")
            .field("store", &self.store.name())
            .field("has_focus_observer", &self.on_editor_focus.is_some())
            .finish()
    }
}

// ─── Dashboard ───────────────────────────────────────────────────────

/// The toolbar button that opens the save dialog.
pub const SAVE_BUTTON: ControlId = ControlId::new("dashboard.save");

/// Container, layout tree and save dialog for one dashboard session.
#[derive(Debug)]
pub struct Dashboard<D = ForwardingDispatcher> {
    container: DashboardContainer,
    layout: DashboardLayoutModel,
    dispatcher: D,
    dialog: Option<SaveDialog>,
    changes_saved: bool,
}

impl Dashboard {
    /// Dashboard with the forwarding dispatcher.
    #[must_use]
    pub fn new(layout: DashboardLayoutModel, margins: Margins) -> Self {
        Self::with_dispatcher(layout, margins, ForwardingDispatcher)
    }
}

impl<D: ActionDispatcher> Dashboard<D> {
    /// Dashboard with a custom dispatcher.
    #[must_use]
    pub fn with_dispatcher(layout: DashboardLayoutModel, margins: Margins, dispatcher: D) -> Self {
        Self {
            container: DashboardContainer::new(margins),
            layout,
            dispatcher,
            dialog: None,
            changes_saved: true,
        }
    }

    /// The container.
    #[must_use]
    pub fn container(&self) -> &DashboardContainer {
        &self.container
    }

    /// The layout tree.
    #[must_use]
    pub fn layout(&self) -> &DashboardLayoutModel {
        &self.layout
    }

    /// The open save dialog, if any.
    #[must_use]
    pub fn dialog(&self) -> Option<&SaveDialog> {
        self.dialog.as_ref()
    }

    /// Whether the layout is unchanged since the last save.
    #[must_use]
    pub fn changes_saved(&self) -> bool {
        self.changes_saved
    }

    /// Open the save dialog, pre-filled from the current override.
    pub fn open_save_dialog(&mut self) -> Invalidation {
        if self.dialog.is_some() {
            return Invalidation::empty();
        }
        self.dialog = Some(SaveDialog::open_for(&self.container.height()));
        Invalidation::DIALOG
    }

    /// Close the dialog without saving.
    pub fn dismiss_save_dialog(&mut self) -> Invalidation {
        if self.dialog.take().is_some() {
            Invalidation::DIALOG
        } else {
            Invalidation::empty()
        }
    }

    /// Adopt a confirmed save and close the dialog.
    pub fn save(&mut self, save: &SaveEvent) -> Invalidation {
        let mut changed = self.container.apply(save);
        if self.dialog.take().is_some() {
            changed |= Invalidation::DIALOG;
        }
        self.changes_saved = true;
        changed
    }

    /// Pass a layout action through the dispatcher and apply the result.
    ///
    /// Forwarded actions are never vetoed; the dashboard is marked unsaved
    /// even when the action matched nothing in the tree.
    pub fn dispatch(&mut self, action: LayoutAction) -> Invalidation {
        let action = self.dispatcher.dispatch(action);
        self.layout.apply(&action);
        self.changes_saved = false;
        Invalidation::LAYOUT
    }

    /// Build content for every visible tab.
    pub fn panels<F: PanelFactory>(&self, factory: &mut F) -> Vec<(String, F::Panel)> {
        self.layout.build_panels(factory)
    }

    /// Route a host event to the dialog (when open) or the toolbar.
    pub fn handle_event(&mut self, event: &Event) -> Invalidation {
        if let Some(dialog) = self.dialog.as_mut() {
            return match dialog.handle_event(event) {
                DialogOutcome::Open(changed) => changed,
                DialogOutcome::Saved(save) => self.save(&save),
                DialogOutcome::Dismissed => self.dismiss_save_dialog(),
            };
        }
        match event {
            Event::Click(control) if *control == SAVE_BUTTON => self.open_save_dialog(),
            _ => Invalidation::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use qdash_core::{LengthUnit, MarginConfig};
    use qdash_layout::{LayoutNode, RowNode, TabSetNode};
    use qdash_runtime::MemoryStore;

    use super::*;

    fn layout() -> DashboardLayoutModel {
        DashboardLayoutModel::new(RowNode {
            id: "root".into(),
            weight: 1,
            children: vec![
                LayoutNode::TabSet(TabSetNode {
                    id: "left".into(),
                    weight: 60,
                    selected: 0,
                    children: vec![
                        TabDescriptor::new("c1", "Prices", "chart"),
                        TabDescriptor::new("c2", "Volume", "chart"),
                    ],
                }),
                LayoutNode::TabSet(TabSetNode {
                    id: "right".into(),
                    weight: 40,
                    selected: 0,
                    children: vec![TabDescriptor::new("q1", "Query", "editor")],
                }),
            ],
        })
        .unwrap()
    }

    #[test]
    fn unset_height_uses_default_top_margin() {
        let container = DashboardContainer::new(Margins::default());
        assert_eq!(container.computed_height().to_string(), "calc(100vh - 37px)");
        assert_eq!(container.computed_width().to_string(), "calc(100vw - 0px)");
    }

    #[test]
    fn fixed_height_is_used_literally() {
        let mut container = DashboardContainer::new(Margins::default());
        let save = SaveEvent {
            height: HeightSpec::Fixed(CssLength::px(600.0)),
        };
        assert_eq!(container.apply(&save), Invalidation::DIMENSIONS);
        assert_eq!(container.apply(&save), Invalidation::empty());
        assert_eq!(container.computed_height().to_string(), "600px");
        assert_eq!(
            container.style().to_css(),
            "position: relative; width: calc(100vw - 0px); height: 600px"
        );
    }

    #[test]
    fn configured_margins_flow_into_formulas() {
        let margins = MarginConfig::new()
            .with_top_margin("50px")
            .with_right_margin("2em")
            .resolve();
        let container = DashboardContainer::new(margins);
        assert_eq!(container.computed_height().to_string(), "calc(100vh - 50px)");
        assert_eq!(container.computed_width().to_string(), "calc(100vw - 2em)");
    }

    #[test]
    fn save_flow_through_events() {
        let mut dash = Dashboard::new(layout(), Margins::default());
        let weights = dash.layout().weights();

        assert_eq!(dash.handle_event(&Event::Click(SAVE_BUTTON)), Invalidation::DIALOG);
        dash.handle_event(&Event::check(SaveDialog::USE_FIXED_HEIGHT, true));
        dash.handle_event(&Event::input(SaveDialog::HEIGHT_INPUT, "nope"));
        dash.handle_event(&Event::Click(SaveDialog::SAVE));
        assert!(dash.dialog().is_some(), "invalid height keeps the dialog open");
        assert_eq!(dash.container().height(), HeightSpec::Unset);

        dash.handle_event(&Event::input(SaveDialog::HEIGHT_INPUT, "50vh"));
        let changed = dash.handle_event(&Event::Click(SaveDialog::SAVE));
        assert_eq!(changed, Invalidation::DIMENSIONS | Invalidation::DIALOG);
        assert!(dash.dialog().is_none());
        assert_eq!(
            dash.container().height(),
            HeightSpec::Fixed(CssLength::new(50.0, LengthUnit::Vh))
        );
        assert_eq!(dash.layout().weights(), weights);

        // Reopen: pre-selected and pre-filled.
        dash.open_save_dialog();
        let dialog = dash.dialog().unwrap();
        assert!(dialog.use_fixed_height());
        assert_eq!(dialog.height_text(), "50vh");

        dash.handle_event(&Event::check(SaveDialog::USE_FIXED_HEIGHT, false));
        dash.handle_event(&Event::Click(SaveDialog::SAVE));
        assert_eq!(dash.container().computed_height().to_string(), "calc(100vh - 37px)");
    }

    #[test]
    fn cancel_leaves_height_alone() {
        let mut dash = Dashboard::new(layout(), Margins::default());
        dash.open_save_dialog();
        dash.handle_event(&Event::check(SaveDialog::USE_FIXED_HEIGHT, true));
        assert_eq!(dash.handle_event(&Event::Click(SaveDialog::CANCEL)), Invalidation::DIALOG);
        assert!(dash.dialog().is_none());
        assert_eq!(dash.container().height(), HeightSpec::Unset);
    }

    #[test]
    fn layout_actions_mark_unsaved() {
        let mut dash = Dashboard::new(layout(), Margins::default());
        assert!(dash.changes_saved());
        let changed = dash.dispatch(LayoutAction::SelectTab {
            tab_id: "c2".into(),
        });
        assert_eq!(changed, Invalidation::LAYOUT);
        assert!(!dash.changes_saved());
        dash.save(&SaveEvent {
            height: HeightSpec::Unset,
        });
        assert!(dash.changes_saved());

        let changed = dash.dispatch(LayoutAction::SelectTab {
            tab_id: "missing".into(),
        });
        assert_eq!(changed, Invalidation::LAYOUT);
        assert!(!dash.changes_saved());
    }

    #[test]
    fn deleted_tab_leaves_the_panels() {
        let mut dash = Dashboard::new(layout(), Margins::default());
        let mut factory = DashboardPanels::new(MemoryStore::new().shared());
        assert_eq!(
            dash.dispatch(LayoutAction::DeleteTab {
                tab_id: "c1".into(),
            }),
            Invalidation::LAYOUT
        );
        let ids: Vec<_> = dash
            .panels(&mut factory)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert!(!ids.contains(&"c1".to_string()));
        assert_eq!(ids[0], "c2");

        dash.dispatch(LayoutAction::MoveTab {
            tab_id: "c2".into(),
            to_tabset: "right".into(),
            index: 0,
        });
        let ids: Vec<_> = dash
            .panels(&mut factory)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["c2".to_string()]);
        assert!(!dash.changes_saved());
    }

    #[test]
    fn panels_cover_visible_tabs() {
        let dash = Dashboard::new(layout(), Margins::default());
        let mut factory = DashboardPanels::new(MemoryStore::new().shared());
        let panels = dash.panels(&mut factory);
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].0, "c1");
        assert_eq!(panels[0].1.summary(), "Prices: Chart component placeholder");
        assert!(matches!(panels[1].1, Panel::Editor(_)));

        let unknown = factory.create(&TabDescriptor::new("x", "X", "table"));
        assert_eq!(unknown.summary(), "Unknown component: table");
    }
}
