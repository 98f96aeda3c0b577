//! # Person Store
//!
//! Data-access layer. Translates entity operations into parameterized SQL
//! and SQL results back into entities or [`ApiError`] kinds.
//!
//! | Type | Role |
//! |------|------|
//! | [`SqlPersonStore`] | Production store over the request's [`Database`] |
//! | [`InMemoryPersonStore`] | Test double with the same contract |

mod database;
mod memory;
mod sql;
mod update;

pub use database::Database;
pub use memory::InMemoryPersonStore;
pub use sql::SqlPersonStore;
pub use update::UpdateBuilder;

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::errors::ApiResult;
use crate::model::Person;

/// Store reasons surfaced inside `ApiError::Internal`
pub mod reasons {
    pub const FETCH_ROW: &str = "cannot fetch row";
    pub const FETCH_ROWS: &str = "cannot fetch rows";
    pub const CREATE: &str = "cannot create new person";
    pub const UPDATE: &str = "cannot update rows";
    pub const DELETE: &str = "cannot delete row";
    pub const MISSING_DATABASE: &str = "database handle missing from request context";
}

/// Persistence operations for the person table
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// Fetch one person by primary key
    async fn get_by_id(&self, ctx: &RequestContext, id: i64) -> ApiResult<Person>;

    /// Fetch every person in storage order; empty when the table is empty
    async fn get(&self, ctx: &RequestContext) -> ApiResult<Vec<Person>>;

    /// Insert a person and return the persisted row
    async fn create(&self, ctx: &RequestContext, person: &Person) -> ApiResult<Person>;

    /// Overwrite only the non-empty revisable fields, then return the row
    async fn update(&self, ctx: &RequestContext, id: i64, person: &Person) -> ApiResult<Person>;

    /// Delete by primary key; a missing row is not an error
    async fn delete(&self, ctx: &RequestContext, id: i64) -> ApiResult<()>;
}
