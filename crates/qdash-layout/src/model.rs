#![forbid(unsafe_code)]

//! Serializable panel tree.
//!
//! The tree is a root [`RowNode`] whose children are rows or tabsets; tabsets
//! hold [`TabDescriptor`]s and remember which one is selected. Weights are
//! relative integers among siblings (`2` next to `1` takes two thirds).
//!
//! # Invariants
//!
//! 1. Node and tab ids are unique across the whole tree.
//! 2. Every weight is non-zero.
//! 3. A non-empty tabset's `selected` index is in range.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::LayoutAction;

/// Tab payload handed to the layout host's factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabDescriptor {
    pub id: String,
    pub name: String,
    /// Component kind the factory dispatches on (e.g. `"chart"`).
    pub component: String,
}

impl TabDescriptor {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            component: component.into(),
        }
    }
}

/// Tabbed container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSetNode {
    pub id: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub selected: usize,
    #[serde(default)]
    pub children: Vec<TabDescriptor>,
}

/// Split container laying children out side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowNode {
    pub id: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub children: Vec<LayoutNode>,
}

/// Child of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutNode {
    Row(RowNode),
    TabSet(TabSetNode),
}

impl LayoutNode {
    /// Node id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Row(row) => &row.id,
            Self::TabSet(set) => &set.id,
        }
    }

    /// Node weight.
    #[must_use]
    pub fn weight(&self) -> u32 {
        match self {
            Self::Row(row) => row.weight,
            Self::TabSet(set) => set.weight,
        }
    }
}

fn default_weight() -> u32 {
    1
}

/// Layout-host content factory, invoked once per visible tab.
///
/// Implemented for any `FnMut(&TabDescriptor) -> P`.
pub trait PanelFactory {
    /// Content value produced for a tab.
    type Panel;

    /// Build content for `tab`.
    fn create(&mut self, tab: &TabDescriptor) -> Self::Panel;
}

impl<P, F> PanelFactory for F
where
    F: FnMut(&TabDescriptor) -> P,
{
    type Panel = P;

    fn create(&mut self, tab: &TabDescriptor) -> P {
        self(tab)
    }
}

/// The dashboard's panel tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardLayoutModel {
    pub root: RowNode,
}

impl DashboardLayoutModel {
    /// Wrap and validate a root row.
    pub fn new(root: RowNode) -> Result<Self, LayoutModelError> {
        let model = Self { root };
        model.validate()?;
        Ok(model)
    }

    /// Check the tree invariants.
    pub fn validate(&self) -> Result<(), LayoutModelError> {
        let mut ids = BTreeSet::new();
        validate_row(&self.root, &mut ids)
    }

    /// The selected tab of every non-empty tabset, depth first.
    #[must_use]
    pub fn visible_tabs(&self) -> Vec<&TabDescriptor> {
        let mut tabs = Vec::new();
        collect_visible(&self.root, &mut tabs);
        tabs
    }

    /// Invoke `factory` once per visible tab, pairing each panel with its tab id.
    pub fn build_panels<F: PanelFactory>(&self, factory: &mut F) -> Vec<(String, F::Panel)> {
        self.visible_tabs()
            .into_iter()
            .map(|tab| (tab.id.clone(), factory.create(tab)))
            .collect()
    }

    /// `(node id, weight)` for every row and tabset, depth first.
    #[must_use]
    pub fn weights(&self) -> Vec<(String, u32)> {
        let mut out = vec![(self.root.id.clone(), self.root.weight)];
        collect_weights(&self.root, &mut out);
        out
    }

    /// Apply a forwarded action, returning whether the tree changed.
    ///
    /// Forwarded actions are never rejected: ids the tree does not know and
    /// zero weights are logged and skipped. `MaximizeTabSet` is view state
    /// owned by the layout host and leaves the tree untouched.
    pub fn apply(&mut self, action: &LayoutAction) -> bool {
        let changed = match action {
            LayoutAction::SelectTab { tab_id } => select_tab(&mut self.root, tab_id),
            LayoutAction::SetWeight { weight: 0, .. } => false,
            LayoutAction::SetWeight { node_id, weight } => {
                set_weight(&mut self.root, node_id, *weight)
            }
            LayoutAction::DeleteTab { tab_id } => take_tab(&mut self.root, tab_id).is_some(),
            LayoutAction::MoveTab {
                tab_id,
                to_tabset,
                index,
            } => self.move_tab(tab_id, to_tabset, *index),
            LayoutAction::MaximizeTabSet { .. } => {
                tracing::trace!(?action, "maximize left to the layout host");
                return false;
            }
        };
        if !changed {
            tracing::debug!(?action, "layout action matched nothing in the tree");
        }
        changed
    }

    fn move_tab(&mut self, tab_id: &str, to_tabset: &str, index: usize) -> bool {
        if tabset_mut(&mut self.root, to_tabset).is_none() {
            return false;
        }
        let Some(tab) = take_tab(&mut self.root, tab_id) else {
            return false;
        };
        let Some(set) = tabset_mut(&mut self.root, to_tabset) else {
            return false;
        };
        let index = index.min(set.children.len());
        set.children.insert(index, tab);
        set.selected = index;
        true
    }
}

fn validate_row(row: &RowNode, ids: &mut BTreeSet<String>) -> Result<(), LayoutModelError> {
    check_node(&row.id, row.weight, ids)?;
    for child in &row.children {
        match child {
            LayoutNode::Row(inner) => validate_row(inner, ids)?,
            LayoutNode::TabSet(set) => {
                check_node(&set.id, set.weight, ids)?;
                if !set.children.is_empty() && set.selected >= set.children.len() {
                    return Err(LayoutModelError::SelectedOutOfRange {
                        tabset: set.id.clone(),
                        selected: set.selected,
                        len: set.children.len(),
                    });
                }
                for tab in &set.children {
                    if !ids.insert(tab.id.clone()) {
                        return Err(LayoutModelError::DuplicateId(tab.id.clone()));
                    }
                }
            }
        }
    }
    Ok(())
}

fn check_node(id: &str, weight: u32, ids: &mut BTreeSet<String>) -> Result<(), LayoutModelError> {
    if weight == 0 {
        return Err(LayoutModelError::ZeroWeight(id.to_owned()));
    }
    if !ids.insert(id.to_owned()) {
        return Err(LayoutModelError::DuplicateId(id.to_owned()));
    }
    Ok(())
}

fn collect_visible<'a>(row: &'a RowNode, out: &mut Vec<&'a TabDescriptor>) {
    for child in &row.children {
        match child {
            LayoutNode::Row(inner) => collect_visible(inner, out),
            LayoutNode::TabSet(set) => {
                if let Some(tab) = set.children.get(set.selected) {
                    out.push(tab);
                }
            }
        }
    }
}

fn collect_weights(row: &RowNode, out: &mut Vec<(String, u32)>) {
    for child in &row.children {
        out.push((child.id().to_owned(), child.weight()));
        if let LayoutNode::Row(inner) = child {
            collect_weights(inner, out);
        }
    }
}

fn select_tab(row: &mut RowNode, tab_id: &str) -> bool {
    for child in &mut row.children {
        match child {
            LayoutNode::Row(inner) => {
                if select_tab(inner, tab_id) {
                    return true;
                }
            }
            LayoutNode::TabSet(set) => {
                if let Some(index) = set.children.iter().position(|t| t.id == tab_id) {
                    set.selected = index;
                    return true;
                }
            }
        }
    }
    false
}

fn set_weight(row: &mut RowNode, node_id: &str, weight: u32) -> bool {
    if row.id == node_id {
        row.weight = weight;
        return true;
    }
    for child in &mut row.children {
        match child {
            LayoutNode::Row(inner) => {
                if set_weight(inner, node_id, weight) {
                    return true;
                }
            }
            LayoutNode::TabSet(set) => {
                if set.id == node_id {
                    set.weight = weight;
                    return true;
                }
            }
        }
    }
    false
}

fn take_tab(row: &mut RowNode, tab_id: &str) -> Option<TabDescriptor> {
    for child in &mut row.children {
        match child {
            LayoutNode::Row(inner) => {
                if let Some(tab) = take_tab(inner, tab_id) {
                    return Some(tab);
                }
            }
            LayoutNode::TabSet(set) => {
                if let Some(index) = set.children.iter().position(|t| t.id == tab_id) {
                    let tab = set.children.remove(index);
                    if set.selected > index || set.selected >= set.children.len() {
                        set.selected = set.selected.saturating_sub(1);
                    }
                    return Some(tab);
                }
            }
        }
    }
    None
}

fn tabset_mut<'a>(row: &'a mut RowNode, id: &str) -> Option<&'a mut TabSetNode> {
    for child in &mut row.children {
        match child {
            LayoutNode::Row(inner) => {
                if let Some(set) = tabset_mut(inner, id) {
                    return Some(set);
                }
            }
            LayoutNode::TabSet(set) if set.id == id => return Some(set),
            LayoutNode::TabSet(_) => {}
        }
    }
    None
}

/// Layout tree validation and action errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutModelError {
    DuplicateId(String),
    ZeroWeight(String),
    SelectedOutOfRange {
        tabset: String,
        selected: usize,
        len: usize,
    },
}

impl fmt::Display for LayoutModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate layout id {id:?}"),
            Self::ZeroWeight(id) => write!(f, "node {id:?} has zero weight"),
            Self::SelectedOutOfRange {
                tabset,
                selected,
                len,
            } => write!(
                f,
                "tabset {tabset:?} selects tab {selected} but has {len} tabs"
            ),
        }
    }
}

impl std::error::Error for LayoutModelError {}
