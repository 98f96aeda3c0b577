//! In-memory person store
//!
//! Test double for [`PersonStore`]. Follows the same contract as the SQL
//! store: monotonic ids, sparse updates, empty list on an empty table.
//! A failure can be injected to drive error paths in the layers above.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::errors::{ApiError, ApiResult};
use crate::model::{Person, PERSON_ENTITY};

use super::PersonStore;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, Person>,
    last_id: i64,
}

/// In-memory store for testing
#[derive(Debug, Default)]
pub struct InMemoryPersonStore {
    table: RwLock<Table>,
    failure: RwLock<Option<ApiError>>,
    calls: AtomicUsize,
}

impl InMemoryPersonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call return `err`
    pub fn fail_with(&self, err: ApiError) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = Some(err);
        }
    }

    pub fn clear_failure(&self) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = None;
        }
    }

    /// Number of store operations invoked so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Count the call and surface any injected failure
    fn enter(&self) -> ApiResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failure = self
            .failure
            .read()
            .map_err(|_| ApiError::internal("Lock poisoned"))?;
        match failure.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn read(&self, id: i64) -> ApiResult<Person> {
        let table = self
            .table
            .read()
            .map_err(|_| ApiError::internal("Lock poisoned"))?;
        table
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(PERSON_ENTITY, id.to_string()))
    }
}

#[async_trait]
impl PersonStore for InMemoryPersonStore {
    async fn get_by_id(&self, _ctx: &RequestContext, id: i64) -> ApiResult<Person> {
        self.enter()?;
        self.read(id)
    }

    async fn get(&self, _ctx: &RequestContext) -> ApiResult<Vec<Person>> {
        self.enter()?;
        let table = self
            .table
            .read()
            .map_err(|_| ApiError::internal("Lock poisoned"))?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn create(&self, _ctx: &RequestContext, person: &Person) -> ApiResult<Person> {
        self.enter()?;
        let mut table = self
            .table
            .write()
            .map_err(|_| ApiError::internal("Lock poisoned"))?;

        table.last_id += 1;
        let id = table.last_id;
        let stored = Person::new(person.name.clone(), person.age, person.address.clone()).with_id(id);
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, _ctx: &RequestContext, id: i64, person: &Person) -> ApiResult<Person> {
        self.enter()?;
        if person.has_no_updates() {
            return Err(ApiError::invalid_fields(["name", "address"]));
        }

        {
            let mut table = self
                .table
                .write()
                .map_err(|_| ApiError::internal("Lock poisoned"))?;
            if let Some(row) = table.rows.get_mut(&id) {
                if !person.name.is_empty() {
                    row.name = person.name.clone();
                }
                if !person.address.is_empty() {
                    row.address = person.address.clone();
                }
            }
        }

        self.read(id)
    }

    async fn delete(&self, _ctx: &RequestContext, id: i64) -> ApiResult<()> {
        self.enter()?;
        let mut table = self
            .table
            .write()
            .map_err(|_| ApiError::internal("Lock poisoned"))?;
        table.rows.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let store = InMemoryPersonStore::new();
        let ctx = RequestContext::detached();

        let first = store.create(&ctx, &Person::new("Abc", 34.0, "Bangalore")).await.unwrap();
        store.delete(&ctx, 1).await.unwrap();
        let second = store.create(&ctx, &Person::new("Xyz", 29.0, "Pune")).await.unwrap();

        assert_eq!(first.id, "1");
        assert_eq!(second.id, "2");
    }

    #[tokio::test]
    async fn test_sparse_update() {
        let store = InMemoryPersonStore::new();
        let ctx = RequestContext::detached();
        store.create(&ctx, &Person::new("Abc", 34.0, "Bangalore")).await.unwrap();

        let updated = store.update(&ctx, 1, &Person::new("Def", 1.0, "")).await.unwrap();
        assert_eq!(updated, Person::new("Def", 34.0, "Bangalore").with_id(1));
    }

    #[tokio::test]
    async fn test_injected_failure_and_call_count() {
        let store = InMemoryPersonStore::new();
        let ctx = RequestContext::detached();
        store.fail_with(ApiError::internal("cannot fetch rows"));

        assert_eq!(
            store.get(&ctx).await.unwrap_err(),
            ApiError::internal("cannot fetch rows")
        );
        store.clear_failure();
        assert!(store.get(&ctx).await.unwrap().is_empty());
        assert_eq!(store.calls(), 2);
    }
}
