//! Mapping from core errors to HTTP responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use crm_core::CrmError;

pub struct ApiError(pub CrmError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<CrmError> for ApiError {
    fn from(err: CrmError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(CrmError::validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(CrmError::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CrmError::Validation(_) => StatusCode::BAD_REQUEST,
            CrmError::NotFound(_) => StatusCode::NOT_FOUND,
            CrmError::Storage(e) => {
                tracing::error!(error = %e, "Request failed with storage error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = serde_json::json!({ "detail": self.0.public_message() });
        (status, Json(body)).into_response()
    }
}
