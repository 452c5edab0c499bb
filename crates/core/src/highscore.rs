//! High score store interface.
//!
//! The round engine only tracks the best score in memory and reports new
//! records through [`RoundEvent::NewHighScore`](crate::types::RoundEvent).
//! Hosts own the store: they `load` once to seed the engine and `save` when a
//! record event arrives. Stores are infallible from the caller's side; a
//! failed load reads as 0 and a failed save is dropped.

use std::sync::atomic::{AtomicU32, Ordering};

/// Persistent best-score storage owned by the host
pub trait HighScoreStore {
    fn load(&self) -> u32;
    fn save(&self, score: u32);
}

/// In-process store, for tests and hosts without persistence
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: AtomicU32,
}

impl MemoryStore {
    pub fn new(initial: u32) -> Self {
        Self {
            value: AtomicU32::new(initial),
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> u32 {
        self.value.load(Ordering::Relaxed)
    }

    fn save(&self, score: u32) {
        self.value.store(score, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::default();
        assert_eq!(store.load(), 0);
        store.save(120);
        assert_eq!(store.load(), 120);
    }
}
