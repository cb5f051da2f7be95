use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Error surface returned by every handler and middleware. Each variant maps
/// to a status code and a `{"detail": ...}` body.
///
/// Unauthenticated and Forbidden are deliberately distinct (401 vs 403): a
/// missing or bad token is not the same condition as a valid token without
/// the admin role.
#[derive(Debug)]
pub enum ApiError {
    Unauthenticated(&'static str),
    Forbidden,
    NotFound(&'static str),
    Validation(String),
    Conflict(&'static str),
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> &str {
        match self {
            ApiError::Unauthenticated(detail) => detail,
            ApiError::Forbidden => "Forbidden",
            ApiError::NotFound(detail) => detail,
            ApiError::Validation(detail) => detail,
            ApiError::Conflict(detail) => detail,
            ApiError::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!("internal error: {detail}");
        }
        let body = json!({ "detail": self.detail() });
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}
