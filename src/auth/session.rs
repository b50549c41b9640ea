//! In-memory session storage
//!
//! Sessions live in a `HashMap` behind a `tokio` `RwLock` and are lost on restart.
//! Ids are random v4 UUIDs. Expired sessions are removed when they are looked up and
//! by a periodic sweep started with [`SessionStore::spawn_cleanup`].

use super::Principal;
use chrono::{DateTime, Duration, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::{sync::RwLock, task::JoinHandle};
use tracing::{debug, info};

/// A logged-in session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque session id, sent to the client in a cookie
    pub id: String,
    /// Who is logged in
    pub principal: Principal,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Check if the session is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Shared, cloneable session store
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    /// Creates an empty store whose sessions last `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Opens a new session for `principal`.
    pub async fn create(&self, principal: Principal) -> Session {
        let now = Utc::now();
        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            principal,
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        debug!(user_id = session.principal.user_id, "Opened session");
        session
    }

    /// Looks up a live session, dropping it if it has expired.
    pub async fn get(&self, id: &str) -> Option<Session> {
        let session = self.sessions.read().await.get(id).cloned()?;
        if session.is_expired() {
            self.sessions.write().await.remove(id);
            debug!(user_id = session.principal.user_id, "Session expired");
            return None;
        }
        Some(session)
    }

    /// Ends a session. Returns whether it existed.
    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Ends every session belonging to `user_id`.
    pub async fn remove_user(&self, user_id: i64) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.principal.user_id != user_id);
        before - sessions.len()
    }

    /// Drops all expired sessions, returning how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        before - sessions.len()
    }

    /// Sweeps expired sessions every `every` until the runtime shuts down.
    pub fn spawn_cleanup(&self, every: std::time::Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut timer = tokio::time::interval(every);
            loop {
                timer.tick().await;
                let removed = store.cleanup_expired().await;
                if removed > 0 {
                    info!(removed, "Swept expired sessions");
                }
            }
        })
    }

    #[cfg(test)]
    async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
