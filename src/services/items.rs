use std::sync::Arc;

use uuid::Uuid;

use crate::database::ItemStore;
use crate::database::models::{Item, ItemChanges, ItemType, NewItem};
use crate::error::AppError;

/// 条目的可编辑字段，页面表单和 JSON 接口共用
#[derive(Debug, Clone, Default)]
pub struct ItemInput {
    pub title: String,
    pub description: Option<String>,
    pub item_type: Option<ItemType>,
    pub completed: Option<bool>,
}

impl ItemInput {
    fn validated(self) -> Result<(String, String), AppError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".into()));
        }
        Ok((title, self.description.unwrap_or_default()))
    }
}

/// Item operations shared by the page routes and the JSON API.
#[derive(Clone)]
pub struct ItemService {
    items: Arc<dyn ItemStore>,
}

impl ItemService {
    pub fn new(items: Arc<dyn ItemStore>) -> Self {
        Self { items }
    }

    pub async fn list(&self) -> Result<Vec<Item>, AppError> {
        Ok(self.items.list().await?)
    }

    pub async fn create(&self, input: ItemInput, owner_id: Option<Uuid>) -> Result<Item, AppError> {
        let item_type = input.item_type.unwrap_or_default();
        let completed = input.completed.unwrap_or(false);
        let (title, description) = input.validated()?;

        let item = self
            .items
            .insert(NewItem {
                title,
                description,
                item_type,
                completed,
                owner_id,
            })
            .await?;
        tracing::info!(item_id = %item.id, "Item created");
        Ok(item)
    }

    pub async fn get(&self, id: &str) -> Result<Item, AppError> {
        let id = parse_id(id)?;
        self.items
            .find(id)
            .await?
            .ok_or_else(AppError::item_not_found)
    }

    pub async fn update(&self, id: &str, input: ItemInput) -> Result<Item, AppError> {
        let id = parse_id(id)?;
        let item_type = input.item_type;
        let completed = input.completed;
        let (title, description) = input.validated()?;

        let item = self
            .items
            .update(
                id,
                ItemChanges {
                    title,
                    description,
                    item_type,
                    completed,
                },
            )
            .await?
            .ok_or_else(AppError::item_not_found)?;
        tracing::info!(item_id = %item.id, "Item updated");
        Ok(item)
    }

    /// Deleting an id that does not exist is still a success.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let Ok(id) = parse_id(id) else {
            return Ok(());
        };

        if self.items.delete(id).await? {
            tracing::info!(item_id = %id, "Item deleted");
        } else {
            tracing::debug!(item_id = %id, "Delete of absent item ignored");
        }
        Ok(())
    }
}

// 非法ID与不存在的ID同样处理
fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::item_not_found())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryItemStore;

    fn service() -> ItemService {
        ItemService::new(Arc::new(MemoryItemStore::new()))
    }

    fn input(title: &str, description: &str) -> ItemInput {
        ItemInput {
            title: title.into(),
            description: Some(description.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn created_item_reads_back() {
        let items = service();
        let created = items.create(input("A", "B"), None).await.unwrap();

        let fetched = items.get(&created.id.to_string()).await.unwrap();
        assert_eq!(fetched.title, "A");
        assert_eq!(fetched.description, "B");
        assert_eq!(fetched.created_at, created.created_at);
        assert_eq!(fetched.item_type, ItemType::Todo);
        assert!(!fetched.completed);
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let items = service();
        let err = items.create(input("   ", "B"), None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(items.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_description_defaults_to_empty() {
        let items = service();
        let item = items
            .create(
                ItemInput {
                    title: "Milk".into(),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(item.description, "");
    }

    #[tokio::test]
    async fn update_replaces_only_title_and_description() {
        let items = service();
        let created = items.create(input("A", "B"), None).await.unwrap();
        let id = created.id.to_string();

        let updated = items.update(&id, input("A2", "B2")).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.title, "A2");
        assert_eq!(updated.description, "B2");
        assert_eq!(updated.item_type, created.item_type);
        assert_eq!(updated.completed, created.completed);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let items = service();
        let err = items
            .update(&Uuid::new_v4().to_string(), input("A2", "B2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = items.update("not-an-id", input("A2", "B2")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn deleted_item_is_gone_and_delete_is_idempotent() {
        let items = service();
        let created = items.create(input("A", "B"), None).await.unwrap();
        let id = created.id.to_string();

        items.delete(&id).await.unwrap();
        items.delete(&id).await.unwrap();
        items.delete("not-an-id").await.unwrap();

        assert!(matches!(items.get(&id).await, Err(AppError::NotFound(_))));
    }
}
