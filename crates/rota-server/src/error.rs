use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rota_core::{EngineError, ErrorKind};
use serde_json::json;

/// Transport wrapper that turns expected domain failures into status codes.
/// Only programming errors ever surface as 500s, and never through here.
pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Duplicate => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Invalid | ErrorKind::LimitReached => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(kind = self.0.kind_str(), status = %status, "Request failed");
        (status, Json(json!({ "message": self.0.to_string() }))).into_response()
    }
}
