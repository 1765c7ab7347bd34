use serde::Deserialize;

use crate::database::models::ItemType;
use crate::services::ItemInput;

#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub item_type: Option<ItemType>,
    pub completed: Option<bool>,
}

impl From<ItemRequest> for ItemInput {
    fn from(req: ItemRequest) -> Self {
        ItemInput {
            title: req.title,
            description: req.description,
            item_type: req.item_type,
            completed: req.completed,
        }
    }
}
