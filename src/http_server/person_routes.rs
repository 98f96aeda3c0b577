//! Person HTTP Routes
//!
//! Transport adapter for the person service. Extracts the path id and
//! the JSON body, builds a fresh request context, and maps the result to
//! an HTTP response. No business rules live here.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::context::RequestContext;
use crate::errors::{ApiError, ApiResult};
use crate::model::Person;
use crate::service::PersonService;
use crate::store::Database;

// ==================
// Shared State
// ==================

/// Person routes state shared across handlers
pub struct PersonState {
    pub service: Arc<dyn PersonService>,
    pub db: Option<Database>,
    pub request_timeout: Duration,
}

impl PersonState {
    pub fn new(
        service: Arc<dyn PersonService>,
        db: Option<Database>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            service,
            db,
            request_timeout,
        }
    }

    /// Fresh context for one request
    fn context(&self) -> RequestContext {
        let ctx = match &self.db {
            Some(db) => RequestContext::new(db.clone()),
            None => RequestContext::detached(),
        };
        ctx.with_timeout(self.request_timeout)
    }
}

// ==================
// Response Types
// ==================

/// Success envelope: `{"data": ...}`
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Json<Self> {
        Json(Self { data })
    }
}

// ==================
// Person Routes
// ==================

/// Create person routes
pub fn person_routes(state: Arc<PersonState>) -> Router {
    Router::new()
        .route("/persons", get(list_handler).post(create_handler))
        .route(
            "/persons/:id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .with_state(state)
}

type SharedState = Arc<PersonState>;

/// Unwrap a JSON body; a rejection is logged and reported as a bad parameter
fn bind(ctx: &RequestContext, payload: Result<Json<Person>, JsonRejection>) -> ApiResult<Person> {
    payload.map(|Json(person)| person).map_err(|rejection| {
        tracing::error!(
            request_id = %ctx.request_id,
            elapsed_ms = ctx.elapsed_ms() as u64,
            error = %rejection,
            "error in binding"
        );
        ApiError::invalid_param("body")
    })
}

/// GET /persons/:id
async fn get_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<Person>>> {
    let ctx = state.context();
    let person = state.service.get_by_id(&ctx, &id).await?;
    Ok(DataResponse::new(person))
}

/// GET /persons
async fn list_handler(
    State(state): State<SharedState>,
) -> ApiResult<Json<DataResponse<Vec<Person>>>> {
    let ctx = state.context();
    let persons = state.service.get(&ctx).await?;
    Ok(DataResponse::new(persons))
}

/// POST /persons
async fn create_handler(
    State(state): State<SharedState>,
    payload: Result<Json<Person>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataResponse<Person>>)> {
    let ctx = state.context();
    let person = bind(&ctx, payload)?;
    let created = state.service.create(&ctx, person).await?;
    Ok((StatusCode::CREATED, DataResponse::new(created)))
}

/// PUT /persons/:id
async fn update_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    payload: Result<Json<Person>, JsonRejection>,
) -> ApiResult<Json<DataResponse<Person>>> {
    let ctx = state.context();
    let person = bind(&ctx, payload)?;
    let updated = state.service.update(&ctx, &id, person).await?;
    Ok(DataResponse::new(updated))
}

/// DELETE /persons/:id
async fn delete_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let ctx = state.context();
    state.service.delete(&ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
