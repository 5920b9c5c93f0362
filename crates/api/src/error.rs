use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use finrec_core::error::EngineError;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Boundary wrapper that turns engine errors into `{error, message}` bodies.
#[derive(Debug)]
pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            EngineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
            EngineError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EngineError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self.0 {
            EngineError::Upstream(err) => {
                sentry_anyhow::capture_anyhow(err);
                tracing::error!(error = %err, "request failed");
            }
            other => tracing::warn!(%status, error = %other, "request rejected"),
        }

        let body = ErrorBody {
            error: self.0.kind(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
