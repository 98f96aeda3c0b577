//! person-api - CRUD REST service for the Person resource
//!
//! Three layers, each behind a trait so it can be swapped for a double:
//!
//! - [`http_server`] - axum handlers mapping HTTP to service calls
//! - [`service`] - id/payload validation and existence checks
//! - [`store`] - parameterized SQL over a `sqlx` SQLite pool
//!
//! A [`context::RequestContext`] is created per request and passed down
//! explicitly, carrying the database handle and the request deadline.

pub mod cli;
pub mod config;
pub mod context;
pub mod errors;
pub mod http_server;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use context::RequestContext;
pub use errors::{ApiError, ApiResult};
pub use model::Person;
