// 数据库模块
// 包含实体定义、存储接口以及 Postgres / 内存两种实现

pub mod memory;
pub mod models;
pub mod repositories;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use models::{Item, ItemChanges, NewItem, NewUser, User};

// 重新导出常用类型，方便其他模块使用
pub use memory::{MemoryItemStore, MemoryUserStore};
pub use repositories::{PgItemRepository, PgUserRepository};

/// 用户凭据存储
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::DuplicateUsername`] when the username is already held.
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;
}

/// 条目存储
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Item>, StoreError>;
    async fn insert(&self, new_item: NewItem) -> Result<Item, StoreError>;
    async fn find(&self, id: Uuid) -> Result<Option<Item>, StoreError>;
    async fn update(&self, id: Uuid, changes: ItemChanges) -> Result<Option<Item>, StoreError>;
    /// Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
