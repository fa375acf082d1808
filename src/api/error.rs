use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::core::errors::AnomalyError;

/// Wraps the core taxonomy so it can travel through axum handlers with `?`.
#[derive(Debug)]
pub struct ApiError(pub AnomalyError);

impl From<AnomalyError> for ApiError {
    fn from(err: AnomalyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AnomalyError::InvalidData(_) => StatusCode::BAD_REQUEST,
            AnomalyError::UnknownCity(_) => StatusCode::NOT_FOUND,
            AnomalyError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            AnomalyError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        error!("API error ({}): {}", status, self.0);

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
