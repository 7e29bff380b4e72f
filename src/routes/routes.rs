//! Defines routes for the registry API.
//!
//! ## Structure
//! - **Public listing**
//!   - `GET    /`, `/todos/{page}`             — all persons, paginated
//!   - `GET    /localizados`, `/localizados/{page}` — located persons
//!   - `GET    /personas/{id}`                 — person detail
//!
//! - **API**
//!   - `POST   /api/upload`                    — photo upload (multipart `photos`)
//!   - `GET    /api/admin/informations`        — list information records
//!   - `POST   /api/admin/informations`        — create
//!   - `GET    /api/admin/informations/{id}`   — fetch
//!   - `DELETE /api/admin/informations/{id}`   — delete
//!   - `PATCH  /api/admin/informations/{id}/archive` — archive toggle
//!
//! Uploaded files are served from `/uploads`.

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        information_handlers::{
            archive_information, create_information, delete_information, get_information,
            list_informations,
        },
        person_handlers::{get_person, list_all, list_all_page, list_located, list_located_page},
        upload_handlers::upload_photos,
    },
    middleware::page_normalization::normalize_pages,
    services::upload_service::PUBLIC_PREFIX,
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Build the router for all registry routes.
///
/// The router carries shared state (`AppState`) to all handlers.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Listing pages
        .route("/", get(list_all))
        .route("/todos/{page}", get(list_all_page))
        .route("/localizados", get(list_located))
        .route("/localizados/{page}", get(list_located_page))
        .route("/personas/{id}", get(get_person))
        // API
        .route("/api/upload", post(upload_photos))
        .route(
            "/api/admin/informations",
            get(list_informations).post(create_information),
        )
        .route(
            "/api/admin/informations/{id}",
            get(get_information).delete(delete_information),
        )
        .route(
            "/api/admin/informations/{id}/archive",
            patch(archive_information),
        )
}

/// Full application: routes, static uploads, page normalization, body limit
/// and request tracing.
pub fn app(state: AppState, max_upload_bytes: usize) -> Router {
    let uploads = ServeDir::new(state.uploads.base_path());

    routes()
        .nest_service(PUBLIC_PREFIX, uploads)
        .layer(middleware::from_fn(normalize_pages))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
