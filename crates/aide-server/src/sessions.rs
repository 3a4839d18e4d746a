use aide::assistant::ChatSession;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

struct StoredSession {
    session: ChatSession,
    last_active: Instant,
}

/// In-memory chat sessions, bounded by idle expiry and a maximum count.
///
/// Sessions idle for longer than `idle_timeout` are dropped on the next access.
/// When a new session would exceed `max_sessions`, the least recently active
/// one is evicted first.
pub struct SessionStore {
    sessions: HashMap<Uuid, StoredSession>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Look up a live session, marking it active
    pub fn get(&mut self, id: &Uuid) -> Option<&mut ChatSession> {
        self.get_at(id, Instant::now())
    }

    /// Look up a session, creating it when absent
    pub fn get_or_create(&mut self, id: Uuid) -> &mut ChatSession {
        self.get_or_create_at(id, Instant::now())
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<ChatSession> {
        self.prune_expired(Instant::now());
        self.sessions.remove(id).map(|stored| stored.session)
    }

    fn get_at(&mut self, id: &Uuid, now: Instant) -> Option<&mut ChatSession> {
        self.prune_expired(now);
        self.sessions.get_mut(id).map(|stored| {
            stored.last_active = now;
            &mut stored.session
        })
    }

    fn get_or_create_at(&mut self, id: Uuid, now: Instant) -> &mut ChatSession {
        self.prune_expired(now);
        if !self.sessions.contains_key(&id) {
            while self.sessions.len() >= self.max_sessions {
                self.evict_least_recent();
            }
        }

        let stored = self.sessions.entry(id).or_insert_with(|| StoredSession {
            session: ChatSession::new(),
            last_active: now,
        });
        stored.last_active = now;
        &mut stored.session
    }

    fn prune_expired(&mut self, now: Instant) {
        let idle_timeout = self.idle_timeout;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, stored| now.saturating_duration_since(stored.last_active) <= idle_timeout);
        let expired = before - self.sessions.len();
        if expired > 0 {
            tracing::debug!(expired, "expired idle sessions");
        }
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|(_, stored)| stored.last_active)
            .map(|(id, _)| *id);
        if let Some(id) = oldest {
            tracing::debug!(session_id = %id, "evicting least recently active session");
            self.sessions.remove(&id);
        }
    }
}
