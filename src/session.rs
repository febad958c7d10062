//! Per-client encounter storage.
//!
//! A store holds at most one encounter per client identifier. Stores are
//! plain single-owner maps; the battle service wraps its store in a lock so
//! each start/action is one atomic read-modify-write.

use crate::combat::Encounter;
use std::collections::HashMap;

/// Storage for active encounters keyed by client identifier.
pub trait SessionStore {
    /// Returns a copy of the encounter stored for `client_id`, if any.
    fn get(&self, client_id: &str) -> Option<Encounter>;

    /// Stores `encounter`, returning whatever it replaced.
    fn put(&mut self, client_id: &str, encounter: Encounter) -> Option<Encounter>;

    /// Removes and returns the encounter for `client_id`.
    fn remove(&mut self, client_id: &str) -> Option<Encounter>;

    /// Number of active encounters.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    encounters: HashMap<String, Encounter>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client identifiers with an active encounter, in no particular order.
    pub fn client_ids(&self) -> impl Iterator<Item = &str> {
        self.encounters.keys().map(String::as_str)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, client_id: &str) -> Option<Encounter> {
        self.encounters.get(client_id).cloned()
    }

    fn put(&mut self, client_id: &str, encounter: Encounter) -> Option<Encounter> {
        self.encounters.insert(client_id.to_string(), encounter)
    }

    fn remove(&mut self, client_id: &str) -> Option<Encounter> {
        self.encounters.remove(client_id)
    }

    fn len(&self) -> usize {
        self.encounters.len()
    }
}
