use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use portfolio_core::StoreError;

// ---------------------------------------------------------------------------
// Internal sentinel for request validation failures
// ---------------------------------------------------------------------------

/// Carries an HTTP 422 through the `anyhow::Error` chain. Raised at the
/// boundary before a request reaches a repository.
#[derive(Debug)]
struct ValidationError(String);

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

const INTERNAL_DETAIL: &str = "Internal server error";

/// Unified error type for HTTP responses. Bodies are `{"detail": "..."}`;
/// server faults are logged and answered with a generic detail.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 422 Unprocessable Entity error.
    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self(ValidationError(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(v) = self.0.downcast_ref::<ValidationError>() {
            return detail(StatusCode::UNPROCESSABLE_ENTITY, v.0.clone());
        }

        match self.0.downcast_ref::<StoreError>() {
            Some(StoreError::NotFound { kind, .. }) => {
                detail(StatusCode::NOT_FOUND, format!("{kind} not found"))
            }
            Some(StoreError::StorageMissing(path)) => {
                tracing::warn!(path = %path.display(), "collection file missing");
                detail(StatusCode::NOT_FOUND, "Storage file not found")
            }
            Some(
                StoreError::IdSpaceExhausted { .. }
                | StoreError::LockPoisoned(_)
                | StoreError::Io(_)
                | StoreError::Json(_)
                | StoreError::Yaml(_),
            )
            | None => {
                tracing::error!(error = %format!("{:#}", self.0), "request failed");
                detail(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_DETAIL)
            }
        }
    }
}

fn detail(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "detail": message.into() });
    (status, axum::Json(body)).into_response()
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
