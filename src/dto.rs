use crate::model::{ListSummaryDocument, ToDoListDocument, ToDoListItemDocument};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSummary {
    pub id: String,
    pub name: String,
    pub item_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToDoListItem {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToDoList {
    pub id: String,
    pub name: String,
    pub items: Vec<ToDoListItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewList {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewListResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewItem {
    pub label: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToDoItemUpdate {
    pub item_id: String,
    pub checked_state: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<ListSummaryDocument> for ListSummary {
    fn from(value: ListSummaryDocument) -> Self {
        Self {
            id: value.id.to_hex(),
            name: value.name,
            item_count: value.item_count,
        }
    }
}

impl From<ToDoListItemDocument> for ToDoListItem {
    fn from(value: ToDoListItemDocument) -> Self {
        Self {
            id: value.id,
            label: value.label,
            description: value.description,
            checked: value.checked,
        }
    }
}

impl From<ToDoListDocument> for ToDoList {
    fn from(value: ToDoListDocument) -> Self {
        Self {
            // documents read back from the collection always carry an `_id`
            id: value.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: value.name,
            items: value.items.into_iter().map(ToDoListItem::from).collect(),
        }
    }
}
