use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::types::SessionData;

use super::Clock;

/// Per-browser session storage keyed by the session cookie value.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: &str) -> Option<SessionData>;

    async fn set(&self, id: &str, data: SessionData);

    async fn remove(&self, id: &str);
}

struct Entry {
    data: SessionData,
    last_seen: f64,
}

/// Process-local [`SessionStore`]. Sessions vanish when the process exits.
///
/// A session untouched for longer than the idle timeout is treated as gone:
/// `get` no longer returns it and the next `set` drops it from memory.
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
    idle_timeout: f64,
}

impl MemorySessionStore {
    pub fn new(clock: Arc<dyn Clock>, idle_timeout_secs: u64) -> Self {
        MemorySessionStore {
            sessions: Mutex::new(HashMap::new()),
            clock,
            idle_timeout: idle_timeout_secs as f64,
        }
    }

    fn is_idle(&self, entry: &Entry, now: f64) -> bool {
        now - entry.last_seen > self.idle_timeout
    }

    /// Number of sessions held in memory, idle ones not yet pruned included.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, id: &str) -> Option<SessionData> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;

        let entry = sessions.get_mut(id)?;
        if self.is_idle(entry, now) {
            sessions.remove(id);
            return None;
        }

        entry.last_seen = now;
        Some(entry.data.clone())
    }

    async fn set(&self, id: &str, data: SessionData) {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;

        sessions.retain(|_, entry| !self.is_idle(entry, now));
        sessions.insert(
            id.to_string(),
            Entry {
                data,
                last_seen: now,
            },
        );
    }

    async fn remove(&self, id: &str) {
        self.sessions.lock().await.remove(id);
    }
}
