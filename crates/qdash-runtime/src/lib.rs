#![forbid(unsafe_code)]

//! qdash runtime: persisted user preferences.
//!
//! # Key Components
//!
//! - [`KeyValueStore`] - synchronous string store (browser local storage,
//!   JSON file, memory)
//! - [`PersistedPreference`] - typed value read once from a store and
//!   mirrored back on every change
//! - [`PreferenceValue`] - string codec for preference types
//!
//! Storage failures never reach callers of [`PersistedPreference`]; the
//! preference keeps working in memory for the rest of the session.

pub mod preference;
pub mod state_persistence;

pub use preference::{PersistedPreference, PreferenceValue};
#[cfg(feature = "state-persistence")]
pub use state_persistence::FileStore;
pub use state_persistence::{
    KeyValueStore, MemoryStore, SharedStore, StorageError, StorageResult, UnavailableStore,
};
