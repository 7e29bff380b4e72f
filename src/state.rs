use crate::services::{
    information_repository::{InformationRepository, SqliteInformationRepository},
    person_repository::{PersonRepository, SqlitePersonRepository},
    upload_service::UploadService,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Pool used by the readiness probe.
    pub db: SqlitePool,
    pub uploads: UploadService,
    pub informations: Arc<dyn InformationRepository>,
    pub persons: Arc<dyn PersonRepository>,
}

impl AppState {
    /// State backed by the SQLite repositories.
    pub fn new(db: SqlitePool, uploads: UploadService) -> Self {
        Self {
            informations: Arc::new(SqliteInformationRepository::new(db.clone())),
            persons: Arc::new(SqlitePersonRepository::new(db.clone())),
            db,
            uploads,
        }
    }

    /// Swap in a different information store, keeping everything else.
    pub fn with_informations(mut self, informations: Arc<dyn InformationRepository>) -> Self {
        self.informations = informations;
        self
    }
}
