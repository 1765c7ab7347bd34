use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::ItemStore;
use crate::database::models::{Item, ItemChanges, NewItem};
use crate::error::StoreError;

const ITEM_COLUMNS: &str =
    "id, title, description, item_type, completed, owner_id, created_at, updated_at";

/// 条目存储库实现
#[derive(Clone)]
pub struct PgItemRepository {
    pool: PgPool,
}

impl PgItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for PgItemRepository {
    async fn list(&self) -> Result<Vec<Item>, StoreError> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn insert(&self, new_item: NewItem) -> Result<Item, StoreError> {
        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            INSERT INTO items (id, title, description, item_type, completed, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new_item.title)
        .bind(&new_item.description)
        .bind(new_item.item_type.as_str())
        .bind(new_item.completed)
        .bind(new_item.owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Item>, StoreError> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn update(&self, id: Uuid, changes: ItemChanges) -> Result<Option<Item>, StoreError> {
        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            UPDATE items
            SET title = $2,
                description = $3,
                item_type = COALESCE($4, item_type),
                completed = COALESCE($5, completed),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.item_type.map(|t| t.as_str()))
        .bind(changes.completed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
