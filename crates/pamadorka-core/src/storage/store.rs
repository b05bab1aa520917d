//! The persisted state port.
//!
//! Two logical records live in the store, `timerState` and `statistics`,
//! each a JSON document under a fixed key. They are written independently;
//! there is no transaction spanning both.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Fixed keys of the persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    TimerState,
    Statistics,
}

impl StateKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateKey::TimerState => "timerState",
            StateKey::Statistics => "statistics",
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synchronous key-value storage for serialized records.
pub trait StateStore {
    fn load(&self, key: StateKey) -> Result<Option<String>, StoreError>;
    fn save(&self, key: StateKey, value: &str) -> Result<(), StoreError>;
}

/// In-process store. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<StateKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored text, for inspection.
    pub fn raw(&self, key: StateKey) -> Option<String> {
        self.entries.borrow().get(&key).cloned()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: StateKey) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(&key).cloned())
    }

    fn save(&self, key: StateKey, value: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().insert(key, value.to_string());
        Ok(())
    }
}

/// Storage that is switched off. Every operation reports `Unavailable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStore;

impl StateStore for DisabledStore {
    fn load(&self, _key: StateKey) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable)
    }

    fn save(&self, _key: StateKey, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }
}

/// Read and decode a record. Absence, storage faults and malformed JSON
/// all come back as `None`.
pub fn load_record<T: DeserializeOwned>(store: &dyn StateStore, key: StateKey) -> Option<T> {
    let raw = match store.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(StoreError::Unavailable) => {
            tracing::debug!(%key, "storage unavailable, starting fresh");
            return None;
        }
        Err(e) => {
            tracing::warn!(%key, error = %e, "failed to read persisted state");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(%key, error = %e, "discarding malformed persisted state");
            None
        }
    }
}

/// Encode and write a record. Failures are logged, never returned.
pub fn save_record<T: Serialize>(store: &dyn StateStore, key: StateKey, record: &T) {
    let json = match serde_json::to_string(record) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(%key, error = %e, "failed to encode state");
            return;
        }
    };

    match store.save(key, &json) {
        Ok(()) => {}
        Err(StoreError::Unavailable) => {}
        Err(e) => tracing::warn!(%key, error = %e, "failed to persist state"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Probe {
        value: u32,
    }

    #[test]
    fn keys_match_record_names() {
        assert_eq!(StateKey::TimerState.as_str(), "timerState");
        assert_eq!(StateKey::Statistics.to_string(), "statistics");
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        save_record(&store, StateKey::Statistics, &Probe { value: 7 });
        let loaded: Option<Probe> = load_record(&store, StateKey::Statistics);
        assert_eq!(loaded, Some(Probe { value: 7 }));
        assert!(store.raw(StateKey::TimerState).is_none());
    }

    #[test]
    fn malformed_record_reads_as_absent() {
        let store = MemoryStore::new();
        store.save(StateKey::TimerState, "{not json").unwrap();
        let loaded: Option<Probe> = load_record(&store, StateKey::TimerState);
        assert!(loaded.is_none());
    }

    #[test]
    fn disabled_store_is_a_no_op() {
        let store = DisabledStore;
        save_record(&store, StateKey::TimerState, &Probe { value: 1 });
        let loaded: Option<Probe> = load_record(&store, StateKey::TimerState);
        assert!(loaded.is_none());
    }
}
