use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A to-do list as stored in the `todo_lists` collection. Items are embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToDoListDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub items: Vec<ToDoListItemDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToDoListItemDocument {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub checked: bool,
}

/// Projection of a list document used by the summaries query.
#[derive(Debug, Clone, Deserialize)]
pub struct ListSummaryDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub item_count: u32,
}

impl ToDoListDocument {
    pub fn new(name: String) -> Self {
        Self {
            id: None,
            name,
            items: Vec::new(),
        }
    }
}
