use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{ClientSession, Collection};
use uuid::Uuid;

use crate::dto::{ListSummary, ToDoList};
use crate::error::DalError;
use crate::model::{ListSummaryDocument, ToDoListDocument};

pub type SummaryStream<'a> = BoxStream<'a, Result<ListSummary, DalError>>;

/// Data access for to-do lists and their embedded items.
///
/// Every operation takes an optional session and hands it to the driver as-is,
/// so callers can group several operations in one transaction. The DAL never
/// starts or commits transactions itself.
#[derive(Clone, Debug)]
pub struct ToDoDal {
    collection: Collection<ToDoListDocument>,
}

fn parse_list_id(list_id: &str) -> Result<ObjectId, DalError> {
    ObjectId::parse_str(list_id).map_err(|source| DalError::InvalidId {
        id: list_id.to_string(),
        source,
    })
}

impl ToDoDal {
    pub fn new(collection: Collection<ToDoListDocument>) -> Self {
        Self { collection }
    }

    /// Streams a summary of every list, sorted by name.
    #[tracing::instrument(skip_all)]
    pub async fn list_summaries<'a>(
        &'a self,
        session: Option<&'a mut ClientSession>,
    ) -> Result<SummaryStream<'a>, DalError> {
        let summaries = self.collection.clone_with_type::<ListSummaryDocument>();
        let options = FindOptions::builder()
            .projection(doc! { "name": 1, "item_count": { "$size": { "$ifNull": ["$items", []] } } })
            .sort(doc! { "name": 1 })
            .build();
        match session {
            Some(session) => {
                let cursor = summaries.find_with_session(None, options, &mut *session).await?;
                let summaries = stream::try_unfold((cursor, session), |(mut cursor, session)| async move {
                    match cursor.next(session).await {
                        Some(Ok(summary)) => Ok(Some((ListSummary::from(summary), (cursor, session)))),
                        Some(Err(err)) => Err(DalError::from(err)),
                        None => Ok(None),
                    }
                });
                Ok(summaries.boxed())
            }
            None => {
                let cursor = summaries.find(None, options).await?;
                Ok(cursor.map_ok(ListSummary::from).map_err(DalError::from).boxed())
            }
        }
    }

    /// Inserts an empty list and returns its id as hex.
    #[tracing::instrument(skip(self, session), err)]
    pub async fn create_list(&self, name: &str, session: Option<&mut ClientSession>) -> Result<String, DalError> {
        let list = ToDoListDocument::new(name.to_string());
        let result = match session {
            Some(session) => self.collection.insert_one_with_session(list, None, session).await?,
            None => self.collection.insert_one(list, None).await?,
        };
        let id = result.inserted_id.as_object_id().ok_or(DalError::MissingInsertedId)?;
        Ok(id.to_hex())
    }

    #[tracing::instrument(skip(self, session), err)]
    pub async fn get_list(&self, list_id: &str, session: Option<&mut ClientSession>) -> Result<ToDoList, DalError> {
        let filter = doc! { "_id": parse_list_id(list_id)? };
        let list = match session {
            Some(session) => self.collection.find_one_with_session(filter, None, session).await?,
            None => self.collection.find_one(filter, None).await?,
        };
        list.map(ToDoList::from)
            .ok_or_else(|| DalError::NotFound(list_id.to_string()))
    }

    /// Returns `true` if exactly one list was removed.
    #[tracing::instrument(skip(self, session), err)]
    pub async fn delete_list(&self, list_id: &str, session: Option<&mut ClientSession>) -> Result<bool, DalError> {
        let filter = doc! { "_id": parse_list_id(list_id)? };
        let result = match session {
            Some(session) => self.collection.delete_one_with_session(filter, None, session).await?,
            None => self.collection.delete_one(filter, None).await?,
        };
        Ok(result.deleted_count == 1)
    }

    /// Appends an unchecked item. `None` if the list does not exist.
    #[tracing::instrument(skip(self, session), err)]
    pub async fn create_item(
        &self,
        list_id: &str,
        label: &str,
        session: Option<&mut ClientSession>,
    ) -> Result<Option<ToDoList>, DalError> {
        let filter = doc! { "_id": parse_list_id(list_id)? };
        let update = doc! {
            "$push": {
                "items": {
                    "id": Uuid::new_v4().simple().to_string(),
                    "label": label,
                    "checked": false,
                }
            }
        };
        self.update_list(filter, update, session).await
    }

    /// Sets the checked flag of one item. `None` if either id does not match.
    #[tracing::instrument(skip(self, session), err)]
    pub async fn set_checked(
        &self,
        list_id: &str,
        item_id: &str,
        checked: bool,
        session: Option<&mut ClientSession>,
    ) -> Result<Option<ToDoList>, DalError> {
        let filter = doc! { "_id": parse_list_id(list_id)?, "items.id": item_id };
        let update = doc! { "$set": { "items.$.checked": checked } };
        self.update_list(filter, update, session).await
    }

    /// Removes an item. An unknown item id leaves the list unchanged;
    /// `None` only if the list does not exist.
    #[tracing::instrument(skip(self, session), err)]
    pub async fn delete_item(
        &self,
        list_id: &str,
        item_id: &str,
        session: Option<&mut ClientSession>,
    ) -> Result<Option<ToDoList>, DalError> {
        let filter = doc! { "_id": parse_list_id(list_id)? };
        let update = doc! { "$pull": { "items": { "id": item_id } } };
        self.update_list(filter, update, session).await
    }

    /// Applies `update` to the single document matching `filter` and returns it afterwards.
    async fn update_list(
        &self,
        filter: Document,
        update: Document,
        session: Option<&mut ClientSession>,
    ) -> Result<Option<ToDoList>, DalError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let list = match session {
            Some(session) => {
                self.collection
                    .find_one_and_update_with_session(filter, update, options, session)
                    .await?
            }
            None => self.collection.find_one_and_update(filter, update, options).await?,
        };
        Ok(list.map(ToDoList::from))
    }
}
