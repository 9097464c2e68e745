use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{delete, get, patch, post, web, HttpResponse, ResponseError};
use futures::TryStreamExt;
use mongodb::error::ErrorKind;
use thiserror::Error;

use crate::dal::ToDoDal;
use crate::dto::{ListSummary, MessageResponse, NewItem, NewList, NewListResponse, ToDoItemUpdate};
use crate::error::DalError;

/// Errors surfaced to HTTP clients, rendered as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(MessageResponse::new(self.to_string()))
    }
}

impl From<DalError> for ApiError {
    fn from(err: DalError) -> Self {
        match err {
            DalError::InvalidId { .. } => ApiError::BadRequest(err.to_string()),
            DalError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DalError::Database(ref source) if matches!(*source.kind, ErrorKind::ServerSelection { .. }) => {
                tracing::error!(error = %source, "database unavailable");
                ApiError::Unavailable("database unavailable".to_string())
            }
            DalError::Database(_) | DalError::MissingInsertedId => {
                tracing::error!(error = %err, "request failed");
                ApiError::Internal("internal server error".to_string())
            }
        }
    }
}

fn list_not_found(list_id: &str) -> ApiError {
    ApiError::NotFound(format!("to-do list `{}` not found", list_id))
}

#[get("/lists")]
pub async fn get_all_lists(dal: web::Data<ToDoDal>) -> Result<HttpResponse, ApiError> {
    let summaries: Vec<ListSummary> = dal.list_summaries(None).await?.try_collect().await?;
    Ok(HttpResponse::Ok().json(summaries))
}

#[post("/lists")]
pub async fn create_todo_list(dal: web::Data<ToDoDal>, new_list: web::Json<NewList>) -> Result<HttpResponse, ApiError> {
    let NewList { name } = new_list.into_inner();
    let id = dal.create_list(&name, None).await?;
    Ok(HttpResponse::Created().json(NewListResponse { id, name }))
}

#[get("/lists/{list_id}")]
pub async fn get_list(dal: web::Data<ToDoDal>, list_id: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let list = dal.get_list(&list_id, None).await?;
    Ok(HttpResponse::Ok().json(list))
}

#[delete("/lists/{list_id}")]
pub async fn delete_list(dal: web::Data<ToDoDal>, list_id: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let deleted = dal.delete_list(&list_id, None).await?;
    Ok(HttpResponse::Ok().json(deleted))
}

#[post("/lists/{list_id}/items")]
pub async fn create_todo_list_item(
    dal: web::Data<ToDoDal>,
    list_id: web::Path<String>,
    new_item: web::Json<NewItem>,
) -> Result<HttpResponse, ApiError> {
    let list = dal
        .create_item(&list_id, &new_item.label, None)
        .await?
        .ok_or_else(|| list_not_found(&list_id))?;
    Ok(HttpResponse::Created().json(list))
}

#[delete("/lists/{list_id}/items/{item_id}")]
pub async fn delete_todo_list_item(
    dal: web::Data<ToDoDal>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (list_id, item_id) = path.into_inner();
    let list = dal
        .delete_item(&list_id, &item_id, None)
        .await?
        .ok_or_else(|| list_not_found(&list_id))?;
    Ok(HttpResponse::Ok().json(list))
}

#[patch("/lists/{list_id}/checked_state")]
pub async fn set_checked(
    dal: web::Data<ToDoDal>,
    list_id: web::Path<String>,
    update: web::Json<ToDoItemUpdate>,
) -> Result<HttpResponse, ApiError> {
    let list = dal
        .set_checked(&list_id, &update.item_id, update.checked_state, None)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "item `{}` not found in to-do list `{}`",
                update.item_id, list_id
            ))
        })?;
    Ok(HttpResponse::Ok().json(list))
}

/// Malformed or mistyped JSON bodies are answered with 400 and a message.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(MessageResponse::new(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api")
            .service(get_all_lists)
            .service(create_todo_list)
            .service(get_list)
            .service(delete_list)
            .service(create_todo_list_item)
            .service(delete_todo_list_item)
            .service(set_checked),
    );
}
