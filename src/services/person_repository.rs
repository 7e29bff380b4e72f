//! Read-side persistence for the persons listing.

use super::{StoreError, StoreResult};
use crate::models::person::{PER_PAGE, Person, PersonPage, PersonQuery};
use async_trait::async_trait;
use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite};

const COLUMNS: &str = "id, full_name, age, gender, last_seen_place, last_seen_at, description, \
                       photo, located, located_at, created_at, updated_at";

#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// One page of persons, newest first.
    async fn list(&self, query: PersonQuery) -> StoreResult<PersonPage>;

    async fn find(&self, id: i64) -> StoreResult<Person>;
}

#[derive(Clone)]
pub struct SqlitePersonRepository {
    db: SqlitePool,
}

impl SqlitePersonRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Append the WHERE clause shared by the count and page queries.
fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &PersonQuery) {
    builder.push(" WHERE 1 = 1");
    if query.located_only {
        builder.push(" AND located = 1");
    }
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        builder.push(" AND full_name REGEXP ");
        builder.push_bind(search_pattern(search));
    }
}

/// Case-insensitive literal substring pattern. SQLite's own `LIKE` and
/// `lower()` only fold ASCII, so matching goes through the `regexp` function
/// the pool registers on every connection.
fn search_pattern(search: &str) -> String {
    format!("(?i){}", regex::escape(search))
}

#[async_trait]
impl PersonRepository for SqlitePersonRepository {
    async fn list(&self, query: PersonQuery) -> StoreResult<PersonPage> {
        let page = query.page.max(1);
        let per_page = i64::from(PER_PAGE);
        let offset = i64::try_from(page - 1)
            .unwrap_or(i64::MAX)
            .saturating_mul(per_page);

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM persons");
        push_filters(&mut count, &query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.db).await?;

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM persons", COLUMNS));
        push_filters(&mut select, &query);
        select.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        select.push_bind(per_page);
        select.push(" OFFSET ");
        select.push_bind(offset);

        let rows: Vec<Person> = select.build_query_as().fetch_all(&self.db).await?;
        Ok(PersonPage::new(rows, page, total))
    }

    async fn find(&self, id: i64) -> StoreResult<Person> {
        sqlx::query_as::<_, Person>(&format!("SELECT {} FROM persons WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_one(&self.db)
            .await
            .map_err(|err| match err {
                sqlx::Error::RowNotFound => StoreError::PersonNotFound(id),
                other => StoreError::Sqlx(other),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::{Duration, Utc};

    async fn seeded(count: usize, located_every: usize) -> SqlitePersonRepository {
        let pool = db::connect_in_memory().await.unwrap();
        let base = Utc::now();
        for i in 0..count {
            let created = base + Duration::seconds(i as i64);
            sqlx::query(
                "INSERT INTO persons (full_name, located, created_at, updated_at) VALUES (?, ?, ?, ?)",
            )
            .bind(format!("Person {:02}", i))
            .bind(i % located_every == 0)
            .bind(created)
            .bind(created)
            .execute(&pool)
            .await
            .unwrap();
        }
        SqlitePersonRepository::new(pool)
    }

    #[tokio::test]
    async fn pages_are_sized_and_ordered_newest_first() {
        let repo = seeded(30, 1000).await;

        let first = repo
            .list(PersonQuery {
                page: 1,
                ..PersonQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(first.total, 30);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.data.len(), 12);
        assert_eq!(first.data[0].full_name, "Person 29");

        let last = repo
            .list(PersonQuery {
                page: 3,
                ..PersonQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(last.data.len(), 6);
        assert_eq!(last.data[5].full_name, "Person 00");
    }

    #[tokio::test]
    async fn located_only_and_search_narrow_results() {
        let repo = seeded(10, 2).await;

        let located = repo
            .list(PersonQuery {
                located_only: true,
                page: 1,
                ..PersonQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(located.total, 5);
        assert!(located.data.iter().all(|p| p.located));

        let searched = repo
            .list(PersonQuery {
                search: Some("person 07".into()),
                page: 1,
                ..PersonQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(searched.total, 1);
        assert_eq!(searched.data[0].full_name, "Person 07");
    }

    #[tokio::test]
    async fn wildcards_in_search_are_literal() {
        let repo = seeded(3, 1000).await;
        let page = repo
            .list(PersonQuery {
                search: Some("%".into()),
                page: 1,
                ..PersonQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[test]
    fn search_patterns_escape_regex_syntax() {
        assert_eq!(search_pattern("ana"), "(?i)ana");
        assert_eq!(search_pattern("a.b*"), "(?i)a\\.b\\*");
    }

    #[tokio::test]
    async fn search_folds_accented_letters() {
        let repo = seeded(2, 1000).await;
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO persons (full_name, located, created_at, updated_at) VALUES (?, 0, ?, ?)",
        )
        .bind("JOÃO ÁLVARES")
        .bind(now)
        .bind(now)
        .execute(&repo.db)
        .await
        .unwrap();

        let page = repo
            .list(PersonQuery {
                search: Some("joão álvares".into()),
                page: 1,
                ..PersonQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].full_name, "JOÃO ÁLVARES");

        let partial = repo
            .list(PersonQuery {
                search: Some("álv".into()),
                page: 1,
                ..PersonQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(partial.total, 1);
    }

    #[tokio::test]
    async fn regex_syntax_in_search_is_literal() {
        let repo = seeded(3, 1000).await;
        let page = repo
            .list(PersonQuery {
                search: Some("Person.0".into()),
                page: 1,
                ..PersonQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn huge_page_numbers_are_empty() {
        let repo = seeded(3, 1000).await;
        let page = repo
            .list(PersonQuery {
                page: u64::MAX,
                ..PersonQuery::default()
            })
            .await
            .unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn missing_person_is_not_found() {
        let repo = seeded(0, 1).await;
        assert!(matches!(
            repo.find(9).await.unwrap_err(),
            StoreError::PersonNotFound(9)
        ));
    }
}
