use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 会话缓存数据模型
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CachedSession {
    pub session_id: String,
    pub user_id: Uuid,
    pub username: String,
    pub created_at: i64, // Unix timestamp
    pub expires_at: i64, // Unix timestamp
}

impl CachedSession {
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}
