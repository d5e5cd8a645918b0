#![forbid(unsafe_code)]

//! Typed preferences persisted through a [`KeyValueStore`].
//!
//! A [`PersistedPreference`] reads its key once when constructed and keeps
//! the value in memory. Every change updates memory first and is then written
//! through to the store, so a read that follows a write always observes the
//! new value even when the write failed.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Store unavailable on read | Default used, logged, preference not durable |
//! | Store unavailable on write | Memory updated, logged, preference not durable |
//! | Stored text does not decode | Default used and written back |
//! | Key never written | Default used and written back |
//! | Empty key | Default used, logged, store never touched |
//!
//! None of these surface to the caller.

use std::fmt;
use std::sync::Arc;

use crate::state_persistence::{MemoryStore, SharedStore};

/// String codec for preference values.
///
/// Encodings are part of the storage format: external tools read and write
/// the same strings.
pub trait PreferenceValue: Clone + PartialEq + fmt::Debug {
    /// Encode for storage.
    fn encode(&self) -> String;

    /// Decode stored text; `None` when it is not a valid encoding.
    fn decode(raw: &str) -> Option<Self>;
}

impl PreferenceValue for bool {
    fn encode(&self) -> String {
        String::from(if *self { "true" } else { "false" })
    }

    fn decode(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        }
    }
}

impl PreferenceValue for String {
    fn encode(&self) -> String {
        self.clone()
    }

    fn decode(raw: &str) -> Option<Self> {
        Some(raw.to_owned())
    }
}

/// A typed value mirrored to a key-value store.
pub struct PersistedPreference<T: PreferenceValue> {
    store: SharedStore,
    key: String,
    value: T,
    durable: bool,
}

impl<T: PreferenceValue> PersistedPreference<T> {
    /// Read `key` from `store`, falling back to `default`.
    ///
    /// When the key is missing or undecodable the default is written back
    /// immediately so later reads are stable. An empty key yields a
    /// memory-only preference that never reaches the store.
    pub fn read(store: SharedStore, key: impl Into<String>, default: T) -> Self {
        let mut pref = Self {
            store,
            key: key.into(),
            value: default,
            durable: false,
        };
        if pref.key.is_empty() {
            tracing::warn!(backend = pref.store.name(), "empty preference key, value stays in memory");
            return pref;
        }

        match pref.store.get_item(&pref.key) {
            Ok(Some(raw)) => match T::decode(&raw) {
                Some(value) => {
                    tracing::debug!(key = %pref.key, backend = pref.store.name(), ?value, "loaded preference");
                    pref.value = value;
                    pref.durable = true;
                }
                None => {
                    tracing::warn!(key = %pref.key, stored = %raw, "undecodable preference, resetting to default");
                    pref.persist();
                }
            },
            Ok(None) => pref.persist(),
            Err(error) => {
                tracing::warn!(
                    key = %pref.key,
                    backend = pref.store.name(),
                    %error,
                    "preference store unavailable, using in-memory value"
                );
            }
        }
        pref
    }

    /// A preference backed by a private [`MemoryStore`].
    pub fn in_memory(key: impl Into<String>, default: T) -> Self {
        Self::read(Arc::new(MemoryStore::new()), key, default)
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.value.clone()
    }

    /// Borrow the current value.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Update the value and write it through to the store.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.persist();
    }

    /// Storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the last read or write reached the store.
    #[must_use]
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    /// Name of the backing store.
    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.store.name()
    }

    fn persist(&mut self) {
        if self.key.is_empty() {
            return;
        }
        let encoded = self.value.encode();
        match self.store.set_item(&self.key, &encoded) {
            Ok(()) => {
                tracing::debug!(key = %self.key, value = %encoded, "persisted preference");
                self.durable = true;
            }
            Err(error) => {
                tracing::warn!(
                    key = %self.key,
                    backend = self.store.name(),
                    %error,
                    "failed to persist preference, keeping in-memory value"
                );
                self.durable = false;
            }
        }
    }
}

impl PersistedPreference<bool> {
    /// Flip the value, returning the new one.
    pub fn toggle(&mut self) -> bool {
        let next = !self.value;
        self.set(next);
        next
    }
}

impl<T: PreferenceValue> fmt::Debug for PersistedPreference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedPreference")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("backend", &self.store.name())
            .field("durable", &self.durable)
            .finish()
    }
}
