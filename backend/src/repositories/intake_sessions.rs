use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::intake_models::IntakeSession;

pub type SessionSlot = Arc<Mutex<IntakeSession>>;

/// In-memory intake sessions. Each session has its own lock so its step
/// handlers run one at a time.
pub struct IntakeSessions {
    sessions: DashMap<Uuid, SessionSlot>,
    idle_ttl: Duration,
}

impl IntakeSessions {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_ttl,
        }
    }

    pub fn create(&self) -> (Uuid, SessionSlot) {
        let id = Uuid::new_v4();
        let slot = Arc::new(Mutex::new(IntakeSession::new()));
        self.sessions.insert(id, Arc::clone(&slot));
        (id, slot)
    }

    pub fn get(&self, id: &Uuid) -> Option<SessionSlot> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Drops sessions idle for longer than the ttl. Sessions whose lock is
    /// held are in use and always kept.
    pub fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, slot| match slot.try_lock() {
            Ok(session) => now - session.last_active <= self.idle_ttl,
            Err(_) => true,
        });
        before.saturating_sub(self.sessions.len())
    }
}
