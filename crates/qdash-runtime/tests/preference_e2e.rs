#![forbid(unsafe_code)]

//! Preference persistence end to end.
//!
//! # Invariants
//!
//! 1. **Round-trip**: a value written by one instance is read by the next.
//! 2. **Mirror**: after every read or write the store holds the in-memory
//!    value whenever the store is reachable.
//! 3. **Graceful degradation**: an unreachable store is logged, never raised.

use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use qdash_runtime::{
    KeyValueStore, MemoryStore, PersistedPreference, PreferenceValue, SharedStore,
    UnavailableStore,
};
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

// ============================================================================
// Log capture
// ============================================================================

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<(tracing::Level, String)>>>);

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for Captured {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        if let Ok(mut events) = self.0.lock() {
            events.push((*event.metadata().level(), visitor.0));
        }
    }
}

fn with_captured_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<(tracing::Level, String)>) {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::registry().with(captured.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    let events = captured.0.lock().map(|e| e.clone()).unwrap_or_default();
    (result, events)
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn fresh_instance_observes_previous_write() {
    let store = MemoryStore::new().shared();

    let mut first = PersistedPreference::read(Arc::clone(&store), "expandable", true);
    first.set(false);
    drop(first);

    let second = PersistedPreference::read(store, "expandable", true);
    assert!(!second.get());
}

#[test]
fn stored_encoding_is_plain_text() {
    let store = MemoryStore::new().shared();
    let mut pref = PersistedPreference::read(Arc::clone(&store), "expandable", true);
    assert_eq!(store.get_item("expandable").unwrap().as_deref(), Some("true"));
    pref.toggle();
    assert_eq!(store.get_item("expandable").unwrap().as_deref(), Some("false"));
}

#[test]
fn externally_written_value_is_honoured() {
    let store = MemoryStore::new().shared();
    store.set_item("expandable", "off").unwrap();
    let pref = PersistedPreference::read(store, "expandable", true);
    assert!(!pref.get());
}

// ============================================================================
// Degradation
// ============================================================================

#[test]
fn unavailable_store_is_logged_not_raised() {
    let (pref, events) = with_captured_logs(|| {
        let store: SharedStore = Arc::new(UnavailableStore::new("private mode"));
        let mut pref = PersistedPreference::read(store, "expandable", true);
        pref.toggle();
        pref
    });

    assert!(!pref.get());
    assert!(!pref.is_durable());
    let warnings: Vec<_> = events
        .iter()
        .filter(|(level, _)| *level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 2, "one warning for the read, one for the write");
    assert!(warnings[0].1.contains("unavailable"));
    assert!(warnings[1].1.contains("failed to persist"));
}

// ============================================================================
// Mirror invariant
// ============================================================================

proptest! {
    #[test]
    fn store_mirrors_memory_after_every_toggle(default in any::<bool>(), toggles in 0usize..20) {
        let store = MemoryStore::new().shared();
        let mut pref = PersistedPreference::read(Arc::clone(&store), "expandable", default);
        for _ in 0..toggles {
            pref.toggle();
            let stored = store.get_item("expandable").unwrap().unwrap();
            prop_assert_eq!(bool::decode(&stored), Some(pref.get()));
        }
        prop_assert_eq!(pref.get(), default ^ (toggles % 2 == 1));
    }
}

// ============================================================================
// File store
// ============================================================================

#[cfg(feature = "state-persistence")]
#[test]
fn file_store_survives_restart() {
    use qdash_runtime::FileStore;

    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("state.json");

    {
        let store: SharedStore = Arc::new(FileStore::new(&path));
        let mut pref = PersistedPreference::read(store, "expandable", true);
        pref.set(false);
    }

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["entries"]["expandable"], "false");

    let store: SharedStore = Arc::new(FileStore::new(&path));
    let pref = PersistedPreference::read(store, "expandable", true);
    assert!(!pref.get());
}
