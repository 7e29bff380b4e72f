//! Public listing and detail endpoints.
//!
//! `/` and `/localizados` are page one; `/todos/{page}` and
//! `/localizados/{page}` serve the following pages.

use crate::{
    errors::AppError,
    models::{
        information::InformationFilter,
        person::{PersonDetail, PersonPage, PersonQuery},
    },
    services::StoreError,
    state::AppState,
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    #[serde(flatten)]
    pub page: PersonPage,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub success: bool,
    pub data: PersonDetail,
}

async fn list(
    state: &AppState,
    located_only: bool,
    page: u64,
    params: SearchParams,
) -> Result<Json<ListResponse>, AppError> {
    let page = state
        .persons
        .list(PersonQuery {
            located_only,
            search: params.q,
            page,
        })
        .await
        .map_err(|err| AppError::internal_logged("failed to list persons", err))?;
    Ok(Json(ListResponse {
        success: true,
        page,
    }))
}

/// `GET /`
pub async fn list_all(
    State(state): State<AppState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ListResponse>, AppError> {
    let Query(params) = query?;
    list(&state, false, 1, params).await
}

/// `GET /todos/{page}`
pub async fn list_all_page(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ListResponse>, AppError> {
    let Path(page) = path?;
    let Query(params) = query?;
    list(&state, false, page, params).await
}

/// `GET /localizados`
pub async fn list_located(
    State(state): State<AppState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ListResponse>, AppError> {
    let Query(params) = query?;
    list(&state, true, 1, params).await
}

/// `GET /localizados/{page}`
pub async fn list_located_page(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ListResponse>, AppError> {
    let Path(page) = path?;
    let Query(params) = query?;
    list(&state, true, page, params).await
}

/// `GET /personas/{id}` — the person plus their active information records.
pub async fn get_person(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DetailResponse>, AppError> {
    let Path(id) = path?;
    let person = state.persons.find(id).await.map_err(|err| match err {
        StoreError::PersonNotFound(id) => AppError::not_found(format!("Person {} not found", id)),
        other => AppError::internal_logged("failed to load person", other),
    })?;

    let informations = state
        .informations
        .list(InformationFilter {
            person_id: Some(person.id),
            archived: Some(false),
        })
        .await
        .map_err(|err| AppError::internal_logged("failed to load person informations", err))?;

    Ok(Json(DetailResponse {
        success: true,
        data: PersonDetail {
            person,
            informations,
        },
    }))
}
