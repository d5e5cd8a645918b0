#![forbid(unsafe_code)]

//! Log levels emitted by widget transitions.

use std::sync::{Arc, Mutex};

use qdash_core::Event;
use qdash_runtime::{MemoryStore, UnavailableStore};
use qdash_widgets::{HeightSpec, QueryEditor, SaveDialog};
use tracing::Level;
use tracing::field::{Field, Visit};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

type Records = Arc<Mutex<Vec<(Level, String)>>>;

#[derive(Clone, Default)]
struct Recorder(Records);

struct Message(String);

impl Visit for Message {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for Recorder {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut message = Message(String::new());
        event.record(&mut message);
        if let Ok(mut records) = self.0.lock() {
            records.push((*event.metadata().level(), message.0));
        }
    }
}

fn record(f: impl FnOnce()) -> Vec<(Level, String)> {
    let recorder = Recorder::default();
    let subscriber = tracing_subscriber::registry().with(recorder.clone());
    tracing::subscriber::with_default(subscriber, f);
    recorder.0.lock().map(|r| r.clone()).unwrap_or_default()
}

#[test]
fn toggle_logs_at_debug() {
    let records = record(|| {
        let mut editor = QueryEditor::new(MemoryStore::new().shared());
        editor.toggle_expandable();
    });
    assert!(
        records
            .iter()
            .any(|(level, msg)| *level == Level::DEBUG && msg == "expandable preference toggled"),
        "{records:?}"
    );
    assert!(records.iter().all(|(level, _)| *level > Level::WARN));
}

#[test]
fn focus_changes_log_at_trace() {
    let records = record(|| {
        let mut editor = QueryEditor::new(MemoryStore::new().shared());
        editor.handle_event(&Event::Focus(true));
        editor.handle_event(&Event::Focus(false));
    });
    let focus: Vec<_> = records
        .iter()
        .filter(|(_, msg)| msg == "editor focus changed")
        .collect();
    assert_eq!(focus.len(), 2);
    assert!(focus.iter().all(|(level, _)| *level == Level::TRACE));
}

#[test]
fn rejected_height_is_not_a_warning() {
    let records = record(|| {
        let mut dialog = SaveDialog::open_for(&HeightSpec::Unset);
        dialog.set_use_fixed_height(true);
        dialog.set_height_text("abc");
        assert!(dialog.confirm().is_err());
    });
    assert!(!records.is_empty());
    assert!(records.iter().all(|(level, _)| *level == Level::DEBUG));
}

#[test]
fn unavailable_store_warns_but_editor_works() {
    let records = record(|| {
        let mut editor = QueryEditor::new(UnavailableStore::default().shared()).with_focused(true);
        editor.toggle_expandable();
        assert!(!editor.is_expanded());
    });
    let warnings = records.iter().filter(|(level, _)| *level == Level::WARN).count();
    assert_eq!(warnings, 2, "{records:?}");
}
