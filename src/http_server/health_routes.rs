//! Health HTTP Routes

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::store::Database;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// "up", "down", or "none" when the service runs without a database
    pub database: String,
}

/// Health check route
pub fn health_routes(db: Option<Database>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(db)
}

/// Health check handler; a dead database reports 503
async fn health_handler(State(db): State<Option<Database>>) -> impl IntoResponse {
    let (status, database) = match db {
        Some(db) => {
            if db.ping().await {
                (StatusCode::OK, "up")
            } else {
                (StatusCode::SERVICE_UNAVAILABLE, "down")
            }
        }
        None => (StatusCode::OK, "none"),
    };

    let response = HealthResponse {
        status: if status == StatusCode::OK { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_without_database() {
        let response = health_routes(None)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_with_closed_database() {
        let db = Database::in_memory().await.unwrap();
        db.close().await;

        let response = health_routes(Some(db))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
