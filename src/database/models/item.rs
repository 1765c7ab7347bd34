use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Habit,
    Daily,
    #[default]
    Todo,
}

#[derive(Debug, Error)]
#[error("unknown item type: {0}")]
pub struct UnknownItemType(pub String);

impl ItemType {
    pub const ALL: [ItemType; 3] = [ItemType::Todo, ItemType::Habit, ItemType::Daily];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Habit => "habit",
            ItemType::Daily => "daily",
            ItemType::Todo => "todo",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = UnknownItemType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "habit" => Ok(ItemType::Habit),
            "daily" => Ok(ItemType::Daily),
            "todo" => Ok(ItemType::Todo),
            other => Err(UnknownItemType(other.to_string())),
        }
    }
}

impl TryFrom<String> for ItemType {
    type Error = UnknownItemType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// 条目数据库实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub item_type: ItemType,
    pub completed: bool,
    /// 创建者，仅作记录，不做归属校验
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub item_type: ItemType,
    pub completed: bool,
    pub owner_id: Option<Uuid>,
}

/// 更新时整体替换标题和描述，类型与完成状态仅在提供时修改
#[derive(Debug, Clone)]
pub struct ItemChanges {
    pub title: String,
    pub description: String,
    pub item_type: Option<ItemType>,
    pub completed: Option<bool>,
}
