#![forbid(unsafe_code)]

//! The panel tree is loaded from host-provided JSON.

use qdash_layout::{
    ActionDispatcher, DashboardLayoutModel, ForwardingDispatcher, LayoutAction, LayoutModelError,
};

const MODEL: &str = r#"{
  "root": {
    "id": "root",
    "children": [
      {
        "type": "tab_set",
        "id": "charts",
        "weight": 3,
        "selected": 0,
        "children": [
          { "id": "c1", "name": "Prices", "component": "chart" },
          { "id": "c2", "name": "Spread", "component": "chart" }
        ]
      },
      {
        "type": "tab_set",
        "id": "editors",
        "children": [
          { "id": "q1", "name": "Query", "component": "editor" }
        ]
      }
    ]
  }
}"#;

#[test]
fn loads_with_default_weights() {
    let model: DashboardLayoutModel = serde_json::from_str(MODEL).unwrap();
    model.validate().unwrap();
    assert_eq!(
        model.weights(),
        vec![
            ("root".to_string(), 1),
            ("charts".to_string(), 3),
            ("editors".to_string(), 1)
        ]
    );
    let visible: Vec<_> = model.visible_tabs().iter().map(|t| t.id.clone()).collect();
    assert_eq!(visible, vec!["c1", "q1"]);
}

#[test]
fn dispatched_actions_reach_the_model_unchanged() {
    let mut model: DashboardLayoutModel = serde_json::from_str(MODEL).unwrap();
    let mut dispatcher = ForwardingDispatcher;

    let action = dispatcher.dispatch(LayoutAction::SelectTab {
        tab_id: "c2".into(),
    });
    assert!(model.apply(&action));
    assert_eq!(model.visible_tabs()[0].id, "c2");

    // Host-only actions are accepted without touching the tree.
    let before = model.clone();
    let action = dispatcher.dispatch(LayoutAction::MaximizeTabSet {
        tabset_id: "charts".into(),
    });
    assert!(!model.apply(&action));
    assert_eq!(model, before);
}

#[test]
fn action_json_shape() {
    let action: LayoutAction =
        serde_json::from_str(r#"{"action":"set_weight","node_id":"charts","weight":2}"#).unwrap();
    assert_eq!(
        action,
        LayoutAction::SetWeight {
            node_id: "charts".into(),
            weight: 2
        }
    );
}

#[test]
fn zero_weight_in_json_fails_validation() {
    let json = r#"{"root":{"id":"root","weight":0,"children":[]}}"#;
    let model: DashboardLayoutModel = serde_json::from_str(json).unwrap();
    assert_eq!(
        model.validate(),
        Err(LayoutModelError::ZeroWeight("root".into()))
    );
}
