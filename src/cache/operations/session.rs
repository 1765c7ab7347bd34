use std::sync::Arc;

use redis::{AsyncCommands, Client as RedisClient};

use crate::cache::keys::session_key;
use crate::cache::models::session::CachedSession;
use crate::error::StoreError;

/// 会话缓存操作
pub struct SessionCacheOperations;

impl SessionCacheOperations {
    /// 缓存会话，过期时间由 Redis 负责
    pub async fn cache_session(
        redis: &Arc<RedisClient>,
        session: &CachedSession,
        ttl: u64,
    ) -> Result<(), StoreError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let json = serde_json::to_string(session)?;
        let _: () = conn.set_ex(session_key(&session.session_id), json, ttl).await?;

        Ok(())
    }

    /// 获取会话
    pub async fn get_session(
        redis: &Arc<RedisClient>,
        session_id: &str,
    ) -> Result<Option<CachedSession>, StoreError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let result: Option<String> = conn.get(session_key(session_id)).await?;

        match result {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// 删除会话，键不存在时同样视为成功
    pub async fn remove_session(
        redis: &Arc<RedisClient>,
        session_id: &str,
    ) -> Result<(), StoreError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let _: () = conn.del(session_key(session_id)).await?;

        Ok(())
    }

    pub async fn ping(redis: &Arc<RedisClient>) -> Result<(), StoreError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
