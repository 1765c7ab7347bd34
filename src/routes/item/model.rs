use serde::Deserialize;

use crate::database::models::ItemType;
use crate::error::AppError;
use crate::services::ItemInput;
use crate::views::ItemFormValues;

/// HTML 表单提交的条目字段，未勾选的复选框不会出现在表单中
#[derive(Debug, Default, Deserialize)]
pub struct ItemForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub item_type: String,
    pub completed: Option<String>,
}

impl ItemForm {
    pub fn values(&self) -> ItemFormValues {
        ItemFormValues {
            title: self.title.clone(),
            description: self.description.clone(),
            item_type: self.item_type.parse().unwrap_or_default(),
            completed: self.completed.is_some(),
        }
    }

    fn item_type(&self) -> Result<Option<ItemType>, AppError> {
        match self.item_type.trim() {
            "" => Ok(None),
            raw => raw
                .parse::<ItemType>()
                .map(Some)
                .map_err(|e| AppError::Validation(format!("Unknown item type: {}", e.0))),
        }
    }
}

impl TryFrom<ItemForm> for ItemInput {
    type Error = AppError;

    fn try_from(form: ItemForm) -> Result<Self, Self::Error> {
        let item_type = form.item_type()?;
        let completed = form.completed.is_some();
        Ok(ItemInput {
            title: form.title,
            description: Some(form.description),
            item_type,
            completed: Some(completed),
        })
    }
}
