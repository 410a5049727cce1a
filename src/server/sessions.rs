//! Per-page-load sessions.
//!
//! Every page load gets its own view controller, so reloading resets all
//! state and several pages can be open side by side.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::controller::{ControllerConfig, ViewController};
use crate::error::AppError;

/// One page instance.
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub controller: ViewController,
}

#[derive(Default)]
struct Sessions {
    by_id: HashMap<Uuid, Arc<Session>>,
    /// Creation order, oldest first.
    order: VecDeque<Uuid>,
}

/// Live sessions, bounded by `max_sessions`.
pub struct SessionStore {
    sessions: RwLock<Sessions>,
    max_sessions: usize,
    config: ControllerConfig,
}

impl SessionStore {
    pub fn new(config: ControllerConfig, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(Sessions::default()),
            max_sessions: max_sessions.max(1),
            config,
        }
    }

    /// Create a session with a fresh controller, evicting the oldest
    /// sessions if the store is full.
    pub async fn create(&self) -> Arc<Session> {
        let session = Arc::new(Session {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            controller: ViewController::with_config(self.config.clone()),
        });

        let mut sessions = self.sessions.write().await;
        while sessions.order.len() >= self.max_sessions {
            let Some(oldest) = sessions.order.pop_front() else {
                break;
            };
            sessions.by_id.remove(&oldest);
            debug!("Evicted session {}", oldest);
        }
        sessions.order.push_back(session.id);
        sessions.by_id.insert(session.id, Arc::clone(&session));

        info!("Created session {}", session.id);
        session
    }

    pub async fn get(&self, id: Uuid) -> Result<Arc<Session>, AppError> {
        self.sessions
            .read()
            .await
            .by_id
            .get(&id)
            .cloned()
            .ok_or(AppError::SessionNotFound(id))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tab;

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = SessionStore::new(ControllerConfig::default(), 8);
        let a = store.create().await;
        let b = store.create().await;
        assert_ne!(a.id, b.id);

        a.controller.select_tab(Tab::Analytics).await;
        assert_eq!(b.controller.snapshot().await.current_tab, Tab::Upload);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_oldest_session_is_evicted() {
        let store = SessionStore::new(ControllerConfig::default(), 2);
        let first = store.create().await;
        let second = store.create().await;
        let third = store.create().await;

        assert!(matches!(
            store.get(first.id).await,
            Err(AppError::SessionNotFound(id)) if id == first.id
        ));
        assert!(store.get(second.id).await.is_ok());
        assert!(store.get(third.id).await.is_ok());
        assert_eq!(store.len().await, 2);
    }
}
