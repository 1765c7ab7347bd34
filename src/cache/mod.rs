// 缓存模块
// 会话数据保存在 Redis 中，进程重启后依然有效

pub mod keys;
pub mod models;
pub mod operations;

pub use models::session::CachedSession;
pub use operations::session::SessionCacheOperations;
