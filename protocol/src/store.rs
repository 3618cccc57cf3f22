use core::time::Duration;

use hashbrown::HashMap;
use web_time::Instant;

use crate::Result;

/// Serialized game states keyed by game id.
///
/// Each `save` replaces the whole state, so a game is always restored from one consistent value.
pub trait GameStore {
    fn load(&mut self, id: &str) -> Result<Option<String>>;

    /// Stores `state` under `id`, expiring it `ttl` after this call.
    fn save(&mut self, id: &str, state: String, ttl: Duration) -> Result<()>;

    /// Returns whether an entry was removed.
    fn remove(&mut self, id: &str) -> Result<bool>;
}

#[derive(Clone, Debug)]
struct Entry {
    state: String,
    expires_at: Instant,
}

/// In-process store where every entry expires at the deadline given by its last save.
///
/// Expired entries are dropped when touched, and every `save` sweeps the whole map so abandoned
/// games do not pile up.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every expired entry, returning how many were removed.
    pub fn evict_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            log::debug!("evicted {evicted} expired games");
        }
        evicted
    }
}

impl GameStore for MemoryStore {
    fn load(&mut self, id: &str) -> Result<Option<String>> {
        let Some(entry) = self.entries.get(id) else {
            return Ok(None);
        };
        if entry.expires_at <= Instant::now() {
            log::debug!("game {id:?} expired");
            self.entries.remove(id);
            return Ok(None);
        }
        Ok(Some(entry.state.clone()))
    }

    fn save(&mut self, id: &str, state: String, ttl: Duration) -> Result<()> {
        self.evict_expired();
        let expires_at = Instant::now() + ttl;
        self.entries
            .insert(id.to_owned(), Entry { state, expires_at });
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<bool> {
        Ok(self.entries.remove(id).is_some())
    }
}
