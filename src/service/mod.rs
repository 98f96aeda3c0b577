//! # Person Service
//!
//! Business layer between transport and storage. Validates identifiers
//! and payloads, gates every mutation behind an existence check, and
//! delegates persistence to a [`PersonStore`](crate::store::PersonStore).

mod person;

pub use person::{parse_id, PersonServiceImpl};

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::errors::ApiResult;
use crate::model::Person;

/// Person operations as seen by the transport layer.
///
/// Identifiers arrive as raw path text; parsing them is the service's job.
#[async_trait]
pub trait PersonService: Send + Sync {
    async fn get_by_id(&self, ctx: &RequestContext, id: &str) -> ApiResult<Person>;

    async fn get(&self, ctx: &RequestContext) -> ApiResult<Vec<Person>>;

    async fn create(&self, ctx: &RequestContext, person: Person) -> ApiResult<Person>;

    async fn update(&self, ctx: &RequestContext, id: &str, person: Person) -> ApiResult<Person>;

    async fn delete(&self, ctx: &RequestContext, id: &str) -> ApiResult<()>;
}
