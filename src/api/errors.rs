use crate::errors::SearchError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
    pub code: u16,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiError({}, {})", self.code, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::Json(self);
        (status, body).into_response()
    }
}

/// Helper function to create API errors
pub fn api_error(status: StatusCode, message: &str) -> ApiError {
    ApiError {
        message: message.to_string(),
        code: status.as_u16(),
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        let status = match &err {
            SearchError::NotFound(_) => StatusCode::NOT_FOUND,
            SearchError::MissingEmbedding(_) | SearchError::Parse { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            SearchError::Provider(_) => StatusCode::BAD_GATEWAY,
            SearchError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        api_error(status, &err.to_string())
    }
}
