use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::model::MatchModel;
use crate::scoring::ScoringError;
use crate::storage::MatchStore;

/// One live match's authoritative in-memory state.
///
/// All mutation goes through the ball event processor while holding `state`
/// for write. Scorer actions additionally `try_lock` the `gate`, the
/// per-match serialization point: only a second writer produces a conflict,
/// while snapshot readers share `state` freely and never disturb the scorer.
/// Unrelated matches never contend.
#[derive(Debug)]
pub struct MatchSession {
    pub match_id: String,
    pub state: RwLock<MatchModel>,
    pub gate: Mutex<()>,
}

/// The registry's session map is the only shared mutable structure in the
/// engine. Sessions are created on first touch and evicted lazily when the
/// subscriber set empties; there is no time-based GC.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<MatchSession>>>,
    subscribers: RwLock<HashMap<String, HashSet<String>>>,
    store: Arc<dyn MatchStore>,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            subscribers: RwLock::new(HashMap::new()),
            store,
        }
    }

    /// Return the live session for a match, loading it from storage on first
    /// touch.
    pub async fn open_session(&self, match_id: &str) -> Result<Arc<MatchSession>, ScoringError> {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(match_id) {
                return Ok(session.clone());
            }
        }

        let loaded = self
            .store
            .load_match(match_id)
            .await
            .map_err(|e| ScoringError::Persistence(e.to_string()))?
            .ok_or_else(|| ScoringError::NotFound(format!("match {}", match_id)))?;

        let mut sessions = self.sessions.write().await;
        // another caller may have raced us here
        let session = sessions
            .entry(match_id.to_string())
            .or_insert_with(|| {
                info!(match_id = %match_id, "Opening match session");
                Arc::new(MatchSession {
                    match_id: match_id.to_string(),
                    state: RwLock::new(loaded),
                    gate: Mutex::new(()),
                })
            })
            .clone();
        Ok(session)
    }

    /// Drop a session. Idempotent; a missing session is not an error.
    pub async fn close_session(&self, match_id: &str) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(match_id).is_some() {
            info!(match_id = %match_id, "Closed match session");
        }
        let mut subscribers = self.subscribers.write().await;
        subscribers.remove(match_id);
    }

    pub async fn subscribe(&self, match_id: &str, subscriber_id: &str) {
        let mut subscribers = self.subscribers.write().await;
        subscribers
            .entry(match_id.to_string())
            .or_default()
            .insert(subscriber_id.to_string());
        debug!(match_id = %match_id, subscriber_id = %subscriber_id, "Viewer subscribed");
    }

    /// Remove a viewer; evicts the session when the set empties. Returns
    /// whether the session was evicted.
    pub async fn unsubscribe(&self, match_id: &str, subscriber_id: &str) -> bool {
        let emptied = {
            let mut subscribers = self.subscribers.write().await;
            match subscribers.get_mut(match_id) {
                Some(set) => {
                    set.remove(subscriber_id);
                    set.is_empty()
                }
                None => false,
            }
        };
        if emptied {
            self.close_session(match_id).await;
        }
        emptied
    }

    pub async fn subscriber_count(&self, match_id: &str) -> usize {
        let subscribers = self.subscribers.read().await;
        subscribers.get(match_id).map_or(0, HashSet::len)
    }

    /// Snapshot of all open sessions, for the periodic live-list sweep.
    pub async fn active_sessions(&self) -> Vec<Arc<MatchSession>> {
        let sessions = self.sessions.read().await;
        sessions.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryMatchStore;
    use chrono::Utc;

    async fn registry_with_match(id: &str) -> SessionRegistry {
        let store = Arc::new(InMemoryMatchStore::new());
        let m = MatchModel::new(
            id.into(),
            "t1".into(),
            "team-a".into(),
            "team-b".into(),
            "venue".into(),
            Utc::now(),
            20,
        );
        store.save_match(&m).await.unwrap();
        SessionRegistry::new(store)
    }

    #[tokio::test]
    async fn open_session_loads_once_and_reuses() {
        let registry = registry_with_match("m1").await;
        let first = registry.open_session("m1").await.unwrap();
        let second = registry.open_session("m1").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn open_session_for_unknown_match_fails() {
        let registry = registry_with_match("m1").await;
        let err = registry.open_session("nope").await.unwrap_err();
        assert!(matches!(err, ScoringError::NotFound(_)));
    }

    #[tokio::test]
    async fn close_session_is_idempotent() {
        let registry = registry_with_match("m1").await;
        registry.open_session("m1").await.unwrap();
        registry.close_session("m1").await;
        registry.close_session("m1").await;
        assert!(registry.active_sessions().await.is_empty());
    }

    #[tokio::test]
    async fn last_unsubscribe_evicts_the_session() {
        let registry = registry_with_match("m1").await;
        registry.open_session("m1").await.unwrap();
        registry.subscribe("m1", "viewer-1").await;
        registry.subscribe("m1", "viewer-2").await;
        assert_eq!(registry.subscriber_count("m1").await, 2);

        assert!(!registry.unsubscribe("m1", "viewer-1").await);
        assert_eq!(registry.active_sessions().await.len(), 1);

        assert!(registry.unsubscribe("m1", "viewer-2").await);
        assert!(registry.active_sessions().await.is_empty());
    }

    #[tokio::test]
    async fn sessions_for_different_matches_are_independent() {
        let store = Arc::new(InMemoryMatchStore::new());
        for id in ["m1", "m2"] {
            let m = MatchModel::new(
                id.into(),
                "t1".into(),
                "team-a".into(),
                "team-b".into(),
                "venue".into(),
                Utc::now(),
                20,
            );
            store.save_match(&m).await.unwrap();
        }
        let registry = SessionRegistry::new(store);
        let s1 = registry.open_session("m1").await.unwrap();
        let _gate = s1.gate.try_lock().unwrap();
        // m2's gate is untouched by m1's writer
        let s2 = registry.open_session("m2").await.unwrap();
        assert!(s2.gate.try_lock().is_ok());
    }

    #[tokio::test]
    async fn readers_share_state_while_the_writer_gate_is_held() {
        let registry = registry_with_match("m1").await;
        let session = registry.open_session("m1").await.unwrap();
        let _gate = session.gate.try_lock().unwrap();

        let first = session.state.read().await;
        let second = session.state.read().await;
        assert_eq!(first.id, second.id);
    }
}
