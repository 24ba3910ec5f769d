use dashmap::DashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::session::Session;

pub type SessionId = Uuid;
pub type SessionHandle = Arc<Mutex<Session>>;

struct Entry {
    session: SessionHandle,
    last_seen: Instant,
}

/// Isolated per-user sessions, keyed by the id carried in the client's cookie.
pub struct SessionStore {
    sessions: DashMap<SessionId, Entry>,
    max_entries: usize,
}

impl SessionStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Look up the caller's session, creating a fresh one when the id is
    /// missing, malformed or no longer known. The flag is true on creation.
    pub fn resolve(&self, raw_id: Option<&str>) -> (SessionId, SessionHandle, bool) {
        if let Some(id) = raw_id.and_then(|raw| Uuid::parse_str(raw).ok()) {
            if let Some(mut entry) = self.sessions.get_mut(&id) {
                entry.last_seen = Instant::now();
                return (id, entry.session.clone(), false);
            }
        }

        let (id, session) = self.create();
        (id, session, true)
    }

    pub fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.sessions.get(id).map(|e| e.session.clone())
    }

    fn create(&self) -> (SessionId, SessionHandle) {
        if self.sessions.len() >= self.max_entries {
            self.evict_oldest();
        }

        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(Session::new()));
        self.sessions.insert(
            id,
            Entry {
                session: session.clone(),
                last_seen: Instant::now(),
            },
        );
        debug!(session = %id, "Session created");
        (id, session)
    }

    /// Drop the least recently seen quarter of sessions.
    fn evict_oldest(&self) {
        let mut by_age: Vec<(SessionId, Instant)> = self.sessions
            .iter()
            .map(|r| (*r.key(), r.value().last_seen))
            .collect();
        by_age.sort_by_key(|(_, seen)| *seen);

        let to_remove = (self.max_entries / 4).max(1);
        for (id, _) in by_age.into_iter().take(to_remove) {
            self.sessions.remove(&id);
        }
        info!(evicted = to_remove, remaining = self.sessions.len(), "Session store full, evicted idle sessions");
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
