//! Admin handlers for information records (tips and sightings).
//!
//! - `GET    /api/admin/informations`              — list, `?archived=` / `?personId=` filters
//! - `POST   /api/admin/informations`              — create
//! - `GET    /api/admin/informations/{id}`         — fetch one
//! - `DELETE /api/admin/informations/{id}`         — delete
//! - `PATCH  /api/admin/informations/{id}/archive` — archive / unarchive
//!
//! Access control is expected from a layer in front of these routes.

use crate::{
    errors::AppError,
    models::information::{Information, InformationFilter, NewInformation},
    services::StoreError,
    state::AppState,
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> DataResponse<T> {
    fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Map store errors for routes that distinguish "not found".
fn store_error(context: &str, err: StoreError) -> AppError {
    match err {
        StoreError::InformationNotFound(id) => {
            AppError::not_found(format!("Information {} not found", id))
        }
        StoreError::UnknownPerson(id) => {
            AppError::bad_request(format!("Person {} does not exist", id))
        }
        other => AppError::internal_logged(context, other),
    }
}

/// Extract the `archived` flag; anything other than a JSON boolean is rejected.
pub fn parse_archive_flag(body: &Value) -> Result<bool, AppError> {
    body.get("archived")
        .and_then(Value::as_bool)
        .ok_or_else(|| AppError::bad_request("The `archived` field must be a boolean"))
}

/// `PATCH /api/admin/informations/{id}/archive`
///
/// Validates the body before touching the store, then issues exactly one
/// update. Every store failure, including a missing record, is a 500.
pub async fn archive_information(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DataResponse<Information>>, AppError> {
    let Path(id) = path?;
    let Json(body) = body?;
    let archived = parse_archive_flag(&body)?;

    let record = state
        .informations
        .set_archived(id, archived, Utc::now())
        .await
        .map_err(|err| AppError::internal_logged("failed to update archive state", err))?;

    info!(id, archived, "information archive state changed");

    let message = if archived {
        "Information archived successfully"
    } else {
        "Information unarchived successfully"
    };
    Ok(Json(DataResponse::with_message(record, message)))
}

/// `GET /api/admin/informations`
pub async fn list_informations(
    State(state): State<AppState>,
    query: Result<Query<InformationFilter>, QueryRejection>,
) -> Result<Json<DataResponse<Vec<Information>>>, AppError> {
    let Query(filter) = query?;
    let records = state
        .informations
        .list(filter)
        .await
        .map_err(|err| store_error("failed to list informations", err))?;
    Ok(Json(DataResponse::new(records)))
}

/// `GET /api/admin/informations/{id}`
pub async fn get_information(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DataResponse<Information>>, AppError> {
    let Path(id) = path?;
    let record = state
        .informations
        .find(id)
        .await
        .map_err(|err| store_error("failed to load information", err))?;
    Ok(Json(DataResponse::new(record)))
}

/// `POST /api/admin/informations`
pub async fn create_information(
    State(state): State<AppState>,
    body: Result<Json<NewInformation>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Information>>), AppError> {
    let Json(mut new) = body?;
    new.content = new.content.trim().to_string();
    if new.content.is_empty() {
        return Err(AppError::bad_request("The `content` field must not be empty"));
    }

    let record = state
        .informations
        .create(new)
        .await
        .map_err(|err| store_error("failed to create information", err))?;

    info!(id = record.id, person_id = ?record.person_id, "information created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            record,
            "Information created successfully",
        )),
    ))
}

/// `DELETE /api/admin/informations/{id}`
pub async fn delete_information(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = path?;
    state
        .informations
        .delete(id)
        .await
        .map_err(|err| store_error("failed to delete information", err))?;

    info!(id, "information deleted");
    Ok(Json(MessageResponse {
        success: true,
        message: "Information deleted successfully".into(),
    }))
}
