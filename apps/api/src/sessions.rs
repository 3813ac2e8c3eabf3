//! Session registry: one isolated `ResponseStore` per questionnaire session.
//!
//! Handlers hold a session's mutex for the whole operation, so a batch submission is never
//! observed half-applied and concurrent submissions keep last-write-wins order.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::questionnaire::responses::ResponseStore;

pub type SessionHandle = Arc<Mutex<ResponseStore>>;

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(ResponseStore::new())));
        info!("Session {id} created");
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Like [`get`](Self::get) but reports an unknown session as `NotFound`.
    pub async fn require(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        self.get(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!("Session {id} removed");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::responses::ResponseValue;

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = SessionRegistry::new();
        let a = registry.create().await;
        let b = registry.create().await;
        assert_ne!(a, b);

        registry
            .require(a)
            .await
            .unwrap()
            .lock()
            .await
            .insert("q1.1.1", ResponseValue::Single("교육".into()), None);

        assert_eq!(registry.require(a).await.unwrap().lock().await.len(), 1);
        assert!(registry.require(b).await.unwrap().lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_and_unknown_session() {
        let registry = SessionRegistry::new();
        let id = registry.create().await;
        assert_eq!(registry.len().await, 1);

        assert!(registry.remove(id).await);
        assert!(!registry.remove(id).await);
        assert!(registry.get(id).await.is_none());
        assert!(matches!(
            registry.require(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_submissions_to_one_session() {
        let registry = SessionRegistry::new();
        let id = registry.create().await;

        let mut tasks = Vec::new();
        for i in 0..16 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                let session = registry.require(id).await.unwrap();
                let mut store = session.lock().await;
                store.insert(format!("q1.1.{i}"), ResponseValue::Boolean(true), None);
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }

        assert_eq!(registry.require(id).await.unwrap().lock().await.len(), 16);
    }
}
