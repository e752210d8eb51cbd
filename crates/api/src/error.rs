use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use site_lake_core::document::ValidationError;
use site_lake_core::StoreError;

/// API error type that maps to JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Store(StoreError::PageNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::SiteExists(_)) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::DocumentTooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store(StoreError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_type, message) = match &self {
            ApiError::NotFound(msg) => ("notFound", msg.clone()),
            ApiError::BadRequest(msg) => ("badRequest", msg.clone()),
            ApiError::Unavailable(msg) => {
                tracing::warn!("Service unavailable: {msg}");
                ("unavailable", "Service temporarily unavailable".to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                ("internalError", "An internal error occurred".to_string())
            }
            ApiError::Store(err) if status.is_server_error() => {
                tracing::error!("Store error: {err}");
                ("internalError", "An internal error occurred".to_string())
            }
            ApiError::Store(err) => ("storeError", err.to_string()),
        };

        let body = json!({
            "error": {
                "type": error_type,
                "message": message,
                "statusCode": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Convenience type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;
