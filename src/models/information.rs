//! Represents a tip or sighting ("information") submitted about a person.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

/// A single information record managed from the admin console.
///
/// `archived_at` is set exactly when `archived` is true and holds the time the
/// record was last archived.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Information {
    /// Row identifier.
    pub id: i64,

    /// Person the information refers to, if any.
    pub person_id: Option<i64>,

    /// Free-text body of the tip.
    pub content: String,

    /// Optional contact detail left by the submitter.
    pub contact: Option<String>,

    /// Public paths of attached photos (see `/api/upload`).
    pub photos: Json<Vec<String>>,

    /// Whether the record has been archived.
    pub archived: bool,

    /// When the record was archived; `None` while active.
    pub archived_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload accepted by `POST /api/admin/informations`.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewInformation {
    pub content: String,
    #[serde(default)]
    pub person_id: Option<i64>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Optional filters for listing information records.
#[derive(Deserialize, Debug, Clone, Copy, Default)]
#[serde(rename_all = "camelCase")]
pub struct InformationFilter {
    #[serde(alias = "person_id")]
    pub person_id: Option<i64>,
    pub archived: Option<bool>,
}
