//! Represents a missing person listed by the registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::information::Information;

/// Number of persons shown per listing page.
pub const PER_PAGE: u32 = 12;

/// A missing (or located) person.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: i64,
    pub full_name: String,
    pub age: Option<i64>,
    pub gender: Option<String>,

    /// Place the person was last seen.
    pub last_seen_place: Option<String>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub description: Option<String>,

    /// Public path of the person's main photo.
    pub photo: Option<String>,

    /// True once the person has been found.
    pub located: bool,
    pub located_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which slice of the registry to list.
#[derive(Debug, Clone, Default)]
pub struct PersonQuery {
    /// Restrict to located persons only.
    pub located_only: bool,
    /// Case-insensitive substring match on the full name.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: u64,
}

/// One page of persons plus the totals needed to render pagination.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPage {
    pub data: Vec<Person>,
    pub page: u64,
    pub per_page: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl PersonPage {
    pub fn new(data: Vec<Person>, page: u64, total: i64) -> Self {
        let per_page = i64::from(PER_PAGE);
        Self {
            data,
            page,
            per_page: PER_PAGE,
            total,
            total_pages: (total + per_page - 1) / per_page,
        }
    }
}

/// A person together with the active information records about them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetail {
    #[serde(flatten)]
    pub person: Person,
    pub informations: Vec<Information>,
}
