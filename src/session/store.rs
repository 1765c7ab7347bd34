use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use redis::Client as RedisClient;

use crate::cache::{CachedSession, SessionCacheOperations};
use crate::error::StoreError;

/// 会话持久化接口
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, session: &CachedSession, ttl_secs: u64) -> Result<(), StoreError>;
    async fn load(&self, session_id: &str) -> Result<Option<CachedSession>, StoreError>;
    /// Removing an absent session is not an error.
    async fn remove(&self, session_id: &str) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct RedisSessionStore {
    redis: Arc<RedisClient>,
}

impl RedisSessionStore {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn save(&self, session: &CachedSession, ttl_secs: u64) -> Result<(), StoreError> {
        SessionCacheOperations::cache_session(&self.redis, session, ttl_secs).await
    }

    async fn load(&self, session_id: &str) -> Result<Option<CachedSession>, StoreError> {
        SessionCacheOperations::get_session(&self.redis, session_id).await
    }

    async fn remove(&self, session_id: &str) -> Result<(), StoreError> {
        SessionCacheOperations::remove_session(&self.redis, session_id).await
    }
}

/// Process-local session store. Expiry is left to the manager's timestamp check.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, CachedSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, session: &CachedSession, _ttl_secs: u64) -> Result<(), StoreError> {
        self.sessions
            .write()
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<CachedSession>, StoreError> {
        Ok(self.sessions.read().get(session_id).cloned())
    }

    async fn remove(&self, session_id: &str) -> Result<(), StoreError> {
        self.sessions.write().remove(session_id);
        Ok(())
    }
}
