use serde::Serialize;

/// 写操作的 JSON 响应：`{message, item}`
#[derive(Debug, Serialize)]
pub struct ApiMessage<T: Serialize> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<T>,
}

impl<T: Serialize> ApiMessage<T> {
    pub fn with_item(message: &str, item: T) -> Self {
        Self {
            message: message.to_string(),
            item: Some(item),
        }
    }

    pub fn message(message: &str) -> Self {
        Self {
            message: message.to_string(),
            item: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_only_omits_item() {
        let json = serde_json::to_value(ApiMessage::<()>::message("Item deleted")).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Item deleted" }));
    }
}
