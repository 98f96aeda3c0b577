//! Production person service

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::errors::{ApiError, ApiResult};
use crate::model::{self, Person, PERSON_ENTITY};
use crate::store::PersonStore;

use super::PersonService;

/// Parse a path identifier.
///
/// Text that is not an integer counts as zero, and anything not strictly
/// positive is rejected as `InvalidParam { id }`.
pub fn parse_id(id: &str) -> ApiResult<i64> {
    let parsed = id.parse::<i64>().unwrap_or(0);
    if parsed > 0 {
        Ok(parsed)
    } else {
        Err(ApiError::invalid_param("id"))
    }
}

/// Service backed by any [`PersonStore`]
pub struct PersonServiceImpl<S: PersonStore> {
    store: S,
}

impl<S: PersonStore> PersonServiceImpl<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Existence pre-check for mutations.
    ///
    /// Any failure, internal ones included, is reported as not-found.
    async fn ensure_exists(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        self.get_by_id(ctx, id)
            .await
            .map(|_| ())
            .map_err(|_| ApiError::not_found(PERSON_ENTITY, id))
    }
}

#[async_trait]
impl<S: PersonStore> PersonService for PersonServiceImpl<S> {
    async fn get_by_id(&self, ctx: &RequestContext, id: &str) -> ApiResult<Person> {
        let id = parse_id(id)?;
        self.store.get_by_id(ctx, id).await
    }

    async fn get(&self, ctx: &RequestContext) -> ApiResult<Vec<Person>> {
        self.store.get(ctx).await
    }

    async fn create(&self, ctx: &RequestContext, person: Person) -> ApiResult<Person> {
        model::validate(&person)?;
        self.store.create(ctx, &person).await
    }

    async fn update(&self, ctx: &RequestContext, id: &str, person: Person) -> ApiResult<Person> {
        let parsed = parse_id(id)?;
        if person.has_no_updates() {
            return Err(ApiError::invalid_fields(["name", "address"]));
        }

        self.ensure_exists(ctx, id).await?;
        self.store.update(ctx, parsed, &person).await
    }

    async fn delete(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        let parsed = parse_id(id)?;
        self.ensure_exists(ctx, id).await?;
        self.store.delete(ctx, parsed).await
    }
}
