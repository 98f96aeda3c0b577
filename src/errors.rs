//! # API Errors
//!
//! Error kinds shared by the handler, service and store layers.
//! The same variant surfaces at every layer; only the HTTP boundary
//! turns it into a status code and a JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Result type for person operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Person API errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Malformed path parameter or request body
    #[error("Incorrect value for parameter: {}", .params.join(", "))]
    InvalidParam { params: Vec<String> },

    /// Payload failed field validation
    #[error("Invalid fields provided: {}", .fields.join(", "))]
    InvalidFields { fields: Vec<String> },

    /// No row matched the identifier
    #[error("No '{entity}' found for Id: '{id}'")]
    NotFound { entity: String, id: String },

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Driver or storage failure
    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl ApiError {
    pub fn invalid_param(param: impl Into<String>) -> Self {
        ApiError::InvalidParam {
            params: vec![param.into()],
        }
    }

    pub fn invalid_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ApiError::InvalidFields {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        ApiError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        ApiError::Internal {
            reason: reason.into(),
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidParam { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidFields { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.is_client_error() {
            tracing::debug!(error = %self, "request rejected");
        } else {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
