use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::database::models::{Item, ItemChanges, NewItem, NewUser, User};
use crate::database::{ItemStore, UserStore};
use crate::error::StoreError;

/// In-process user store. Uniqueness is checked and enforced under one write lock.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().get(username).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write();
        if users.contains_key(&new_user.username) {
            return Err(StoreError::DuplicateUsername);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            password_hash: new_user.password_hash,
            display_name: new_user.display_name,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }
}

/// In-process item store; keeps insertion order for `list`.
#[derive(Default)]
pub struct MemoryItemStore {
    items: RwLock<Vec<Item>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn list(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.items.read().clone())
    }

    async fn insert(&self, new_item: NewItem) -> Result<Item, StoreError> {
        let now = Utc::now();
        let item = Item {
            id: Uuid::new_v4(),
            title: new_item.title,
            description: new_item.description,
            item_type: new_item.item_type,
            completed: new_item.completed,
            owner_id: new_item.owner_id,
            created_at: now,
            updated_at: now,
        };
        self.items.write().push(item.clone());
        Ok(item)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Item>, StoreError> {
        Ok(self.items.read().iter().find(|item| item.id == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: ItemChanges) -> Result<Option<Item>, StoreError> {
        let mut items = self.items.write();
        let Some(item) = items.iter_mut().find(|item| item.id == id) else {
            return Ok(None);
        };

        item.title = changes.title;
        item.description = changes.description;
        if let Some(item_type) = changes.item_type {
            item.item_type = item_type;
        }
        if let Some(completed) = changes.completed {
            item.completed = completed;
        }
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut items = self.items.write();
        let before = items.len();
        items.retain(|item| item.id != id);
        Ok(items.len() != before)
    }
}
