//! Persistence for information records.

use super::{StoreError, StoreResult, is_foreign_key_violation};
use crate::models::information::{Information, InformationFilter, NewInformation};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite, types::Json};

const COLUMNS: &str = "id, person_id, content, contact, photos, archived, archived_at, created_at, updated_at";

#[async_trait]
pub trait InformationRepository: Send + Sync {
    /// Records matching `filter`, newest first.
    async fn list(&self, filter: InformationFilter) -> StoreResult<Vec<Information>>;

    async fn find(&self, id: i64) -> StoreResult<Information>;

    /// Insert a new, unarchived record.
    async fn create(&self, new: NewInformation) -> StoreResult<Information>;

    async fn delete(&self, id: i64) -> StoreResult<()>;

    /// Set the archived flag in a single statement, stamping `archived_at`
    /// with `at` when archiving and clearing it otherwise. `updated_at`
    /// becomes `at` either way.
    async fn set_archived(
        &self,
        id: i64,
        archived: bool,
        at: DateTime<Utc>,
    ) -> StoreResult<Information>;
}

#[derive(Clone)]
pub struct SqliteInformationRepository {
    db: SqlitePool,
}

impl SqliteInformationRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

fn not_found(id: i64) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |err| match err {
        sqlx::Error::RowNotFound => StoreError::InformationNotFound(id),
        other => StoreError::Sqlx(other),
    }
}

#[async_trait]
impl InformationRepository for SqliteInformationRepository {
    async fn list(&self, filter: InformationFilter) -> StoreResult<Vec<Information>> {
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM informations WHERE 1 = 1", COLUMNS));

        if let Some(person_id) = filter.person_id {
            builder.push(" AND person_id = ");
            builder.push_bind(person_id);
        }
        if let Some(archived) = filter.archived {
            builder.push(" AND archived = ");
            builder.push_bind(archived);
        }
        builder.push(" ORDER BY created_at DESC, id DESC");

        let rows: Vec<Information> = builder.build_query_as().fetch_all(&self.db).await?;
        Ok(rows)
    }

    async fn find(&self, id: i64) -> StoreResult<Information> {
        sqlx::query_as::<_, Information>(&format!(
            "SELECT {} FROM informations WHERE id = ?",
            COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.db)
        .await
        .map_err(not_found(id))
    }

    async fn create(&self, new: NewInformation) -> StoreResult<Information> {
        let now = Utc::now();
        sqlx::query_as::<_, Information>(&format!(
            "INSERT INTO informations (person_id, content, contact, photos, archived, archived_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, 0, NULL, ?, ?)
             RETURNING {}",
            COLUMNS
        ))
        .bind(new.person_id)
        .bind(&new.content)
        .bind(&new.contact)
        .bind(Json(&new.photos))
        .bind(now)
        .bind(now)
        .fetch_one(&self.db)
        .await
        .map_err(|err| match (new.person_id, err) {
            (Some(person_id), err) if is_foreign_key_violation(&err) => {
                StoreError::UnknownPerson(person_id)
            }
            (_, err) => StoreError::Sqlx(err),
        })
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM informations WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::InformationNotFound(id));
        }
        Ok(())
    }

    async fn set_archived(
        &self,
        id: i64,
        archived: bool,
        at: DateTime<Utc>,
    ) -> StoreResult<Information> {
        sqlx::query_as::<_, Information>(&format!(
            "UPDATE informations SET archived = ?, archived_at = ?, updated_at = ?
             WHERE id = ?
             RETURNING {}",
            COLUMNS
        ))
        .bind(archived)
        .bind(archived.then_some(at))
        .bind(at)
        .bind(id)
        .fetch_one(&self.db)
        .await
        .map_err(not_found(id))
    }
}
