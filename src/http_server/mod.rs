//! # Person API HTTP Server Module
//!
//! Axum transport for the person service.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /persons` - List persons
//! - `POST /persons` - Create a person
//! - `GET /persons/:id` - Fetch one person
//! - `PUT /persons/:id` - Sparse update of name/address
//! - `DELETE /persons/:id` - Delete a person

pub mod config;
pub mod health_routes;
pub mod person_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use person_routes::{person_routes, DataResponse, PersonState};
pub use server::HttpServer;
