use mongodb::bson::oid;
use thiserror::Error;

/// Errors returned by [`crate::dal::ToDoDal`].
#[derive(Debug, Error)]
pub enum DalError {
    /// The identifier is not a valid ObjectId.
    #[error("invalid list id `{id}`: {source}")]
    InvalidId {
        id: String,
        #[source]
        source: oid::Error,
    },

    /// No list document matches the identifier.
    #[error("to-do list `{0}` not found")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// The driver reported an inserted id that is not an ObjectId.
    #[error("inserted list id is not an ObjectId")]
    MissingInsertedId,
}
