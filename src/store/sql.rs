//! SQL-backed person store
//!
//! Stateless: every call pulls the database handle out of the request
//! context. The context deadline bounds waiting for a pooled connection
//! and is checked once more before the first statement is sent. After
//! that the statements run to completion on the acquired connection, so
//! an error never comes back for a write that was committed. Driver
//! errors never leak; they are classified into `NotFound` or `Internal`.

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{FromRow, Sqlite, SqliteConnection};

use crate::context::RequestContext;
use crate::errors::{ApiError, ApiResult};
use crate::model::{Person, PERSON_ENTITY};

use super::reasons;
use super::update::UpdateBuilder;
use super::PersonStore;

const TABLE: &str = "person";
const SELECT_BY_ID: &str = "SELECT id, name, age, address FROM person WHERE id = ?";
const SELECT_ALL: &str = "SELECT id, name, age, address FROM person";
const INSERT: &str = "INSERT INTO person (name, age, address) VALUES (?, ?, ?) RETURNING id";
const DELETE_BY_ID: &str = "DELETE FROM person WHERE id = ?";

#[derive(Debug, FromRow)]
struct PersonRow {
    id: i64,
    name: String,
    age: f64,
    address: String,
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        Person::new(row.name, row.age, row.address).with_id(row.id)
    }
}

/// Production store issuing SQL through the request's database handle
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlPersonStore;

impl SqlPersonStore {
    pub fn new() -> Self {
        Self
    }
}

/// Check out a connection for one operation within the context deadline.
///
/// Expiry surfaces as `reason`; nothing has been sent at that point.
async fn connection(ctx: &RequestContext, reason: &str) -> ApiResult<PoolConnection<Sqlite>> {
    let db = ctx
        .db()
        .ok_or_else(|| ApiError::internal(reasons::MISSING_DATABASE))?;

    if ctx.is_expired() {
        return Err(ApiError::internal(reason));
    }

    let conn = match ctx.run(db.pool().acquire()).await {
        Ok(Ok(conn)) => conn,
        _ => return Err(ApiError::internal(reason)),
    };

    // acquire can win the race against an already-elapsed deadline
    if ctx.is_expired() {
        return Err(ApiError::internal(reason));
    }
    Ok(conn)
}

async fn fetch_row(conn: &mut SqliteConnection, id: i64) -> Result<PersonRow, sqlx::Error> {
    sqlx::query_as::<_, PersonRow>(SELECT_BY_ID)
        .bind(id)
        .fetch_one(conn)
        .await
}

fn found(id: i64, result: Result<PersonRow, sqlx::Error>) -> ApiResult<Person> {
    match result {
        Ok(row) => Ok(row.into()),
        Err(sqlx::Error::RowNotFound) => Err(ApiError::not_found(PERSON_ENTITY, id.to_string())),
        Err(_) => Err(ApiError::internal(reasons::FETCH_ROW)),
    }
}

#[async_trait]
impl PersonStore for SqlPersonStore {
    async fn get_by_id(&self, ctx: &RequestContext, id: i64) -> ApiResult<Person> {
        let mut conn = connection(ctx, reasons::FETCH_ROW).await?;
        found(id, fetch_row(&mut conn, id).await)
    }

    async fn get(&self, ctx: &RequestContext) -> ApiResult<Vec<Person>> {
        let mut conn = connection(ctx, reasons::FETCH_ROWS).await?;
        sqlx::query_as::<_, PersonRow>(SELECT_ALL)
            .fetch_all(&mut *conn)
            .await
            .map(|rows| rows.into_iter().map(Person::from).collect())
            .map_err(|_| ApiError::internal(reasons::FETCH_ROWS))
    }

    async fn create(&self, ctx: &RequestContext, person: &Person) -> ApiResult<Person> {
        let mut conn = connection(ctx, reasons::CREATE).await?;
        let id = sqlx::query_scalar::<_, i64>(INSERT)
            .bind(person.name.as_str())
            .bind(person.age)
            .bind(person.address.as_str())
            .fetch_one(&mut *conn)
            .await
            .map_err(|_| ApiError::internal(reasons::CREATE))?;

        fetch_row(&mut conn, id)
            .await
            .map(Person::from)
            .map_err(|_| ApiError::internal(reasons::CREATE))
    }

    async fn update(&self, ctx: &RequestContext, id: i64, person: &Person) -> ApiResult<Person> {
        let builder = UpdateBuilder::for_person(person);
        if builder.is_empty() {
            return Err(ApiError::invalid_fields(["name", "address"]));
        }

        let mut conn = connection(ctx, reasons::UPDATE).await?;
        let statement = builder.statement(TABLE);
        let mut query = sqlx::query(&statement);
        for value in builder.values() {
            query = query.bind(value);
        }
        query
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|_| ApiError::internal(reasons::UPDATE))?;

        found(id, fetch_row(&mut conn, id).await)
    }

    async fn delete(&self, ctx: &RequestContext, id: i64) -> ApiResult<()> {
        let mut conn = connection(ctx, reasons::DELETE).await?;
        sqlx::query(DELETE_BY_ID)
            .bind(id)
            .execute(&mut *conn)
            .await
            .map(|_| ())
            .map_err(|_| ApiError::internal(reasons::DELETE))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::store::Database;

    async fn setup() -> (SqlPersonStore, RequestContext) {
        let db = Database::in_memory().await.unwrap();
        db.ensure_schema().await.unwrap();
        (SqlPersonStore::new(), RequestContext::new(db))
    }

    #[tokio::test]
    async fn test_create_then_get_by_id() {
        let (store, ctx) = setup().await;

        let created = store
            .create(&ctx, &Person::new("Abc", 34.0, "Bangalore"))
            .await
            .unwrap();
        assert_eq!(created.id, "1");

        let fetched = store.get_by_id(&ctx, 1).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_row() {
        let (store, ctx) = setup().await;
        let err = store.get_by_id(&ctx, 42).await.unwrap_err();
        assert_eq!(err, ApiError::not_found("Person", "42"));
    }

    #[tokio::test]
    async fn test_get_empty_table() {
        let (store, ctx) = setup().await;
        assert!(store.get(&ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_in_storage_order() {
        let (store, ctx) = setup().await;
        store.create(&ctx, &Person::new("Abc", 34.0, "Bangalore")).await.unwrap();
        store.create(&ctx, &Person::new("Xyz", 29.0, "Pune")).await.unwrap();

        let names: Vec<_> = store
            .get(&ctx)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Abc", "Xyz"]);
    }

    #[tokio::test]
    async fn test_update_is_sparse() {
        let (store, ctx) = setup().await;
        store.create(&ctx, &Person::new("Abc", 34.0, "Bangalore")).await.unwrap();

        let updated = store
            .update(&ctx, 1, &Person::new("", 0.0, "Pune"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Abc");
        assert_eq!(updated.age, 34.0);
        assert_eq!(updated.address, "Pune");
    }

    #[tokio::test]
    async fn test_update_rejects_empty_payload() {
        let (store, ctx) = setup().await;
        store.create(&ctx, &Person::new("Abc", 34.0, "Bangalore")).await.unwrap();

        let err = store.update(&ctx, 1, &Person::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidFields { .. }));
    }

    #[tokio::test]
    async fn test_delete_then_missing() {
        let (store, ctx) = setup().await;
        store.create(&ctx, &Person::new("Abc", 34.0, "Bangalore")).await.unwrap();

        store.delete(&ctx, 1).await.unwrap();
        assert_eq!(
            store.get_by_id(&ctx, 1).await.unwrap_err(),
            ApiError::not_found("Person", "1")
        );
        // deleting again touches zero rows and still succeeds
        store.delete(&ctx, 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_table_is_internal() {
        let db = Database::in_memory().await.unwrap();
        let ctx = RequestContext::new(db);
        let store = SqlPersonStore::new();

        assert_eq!(
            store.get_by_id(&ctx, 1).await.unwrap_err(),
            ApiError::internal(reasons::FETCH_ROW)
        );
        assert_eq!(
            store.get(&ctx).await.unwrap_err(),
            ApiError::internal(reasons::FETCH_ROWS)
        );
        assert_eq!(
            store.create(&ctx, &Person::new("Abc", 1.0, "Pune")).await.unwrap_err(),
            ApiError::internal(reasons::CREATE)
        );
        assert_eq!(
            store.update(&ctx, 1, &Person::new("Abc", 1.0, "Pune")).await.unwrap_err(),
            ApiError::internal(reasons::UPDATE)
        );
        assert_eq!(
            store.delete(&ctx, 1).await.unwrap_err(),
            ApiError::internal(reasons::DELETE)
        );
    }

    async fn count(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM person")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_expired_deadline_reports_operation_reason() {
        let db = Database::in_memory().await.unwrap();
        db.ensure_schema().await.unwrap();
        let store = SqlPersonStore::new();
        store
            .create(&RequestContext::new(db.clone()), &Person::new("Abc", 34.0, "Bangalore"))
            .await
            .unwrap();

        let expired = RequestContext::new(db.clone()).with_timeout(Duration::ZERO);
        assert_eq!(
            store.get_by_id(&expired, 1).await.unwrap_err(),
            ApiError::internal(reasons::FETCH_ROW)
        );
        assert_eq!(
            store.get(&expired).await.unwrap_err(),
            ApiError::internal(reasons::FETCH_ROWS)
        );
        assert_eq!(
            store.create(&expired, &Person::new("Xyz", 29.0, "Pune")).await.unwrap_err(),
            ApiError::internal(reasons::CREATE)
        );
        assert_eq!(
            store.update(&expired, 1, &Person::new("Def", 0.0, "")).await.unwrap_err(),
            ApiError::internal(reasons::UPDATE)
        );
        assert_eq!(
            store.delete(&expired, 1).await.unwrap_err(),
            ApiError::internal(reasons::DELETE)
        );

        // nothing was sent: the row is untouched and no new row exists
        assert_eq!(count(&db).await, 1);
        let ctx = RequestContext::new(db);
        assert_eq!(store.get_by_id(&ctx, 1).await.unwrap().name, "Abc");
    }

    /// Whatever instant the deadline lands on, a failed create never leaves
    /// a row behind and a successful one always does.
    #[tokio::test]
    async fn test_create_outcome_matches_committed_rows() {
        let db = Database::in_memory().await.unwrap();
        db.ensure_schema().await.unwrap();
        let store = SqlPersonStore::new();

        for i in 0..200u64 {
            let before = count(&db).await;
            let ctx = RequestContext::new(db.clone()).with_timeout(Duration::from_micros(i % 50));
            let result = store.create(&ctx, &Person::new("Abc", 34.0, "Bangalore")).await;
            let after = count(&db).await;

            match result {
                Ok(person) => {
                    assert_eq!(after, before + 1, "iteration {}", i);
                    assert_eq!(person.name, "Abc");
                }
                Err(err) => {
                    assert_eq!(err, ApiError::internal(reasons::CREATE), "iteration {}", i);
                    assert_eq!(after, before, "iteration {}", i);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_detached_context_is_internal() {
        let store = SqlPersonStore::new();
        let err = store
            .get_by_id(&RequestContext::detached(), 1)
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::internal(reasons::MISSING_DATABASE));
    }
}
