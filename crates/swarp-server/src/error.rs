use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use swarp_core::ResolveError;

/// Generic body for failures nobody anticipated.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(m) | Self::NotFound(m) | Self::Internal(m) => write!(f, "{m}"),
        }
    }
}

impl From<ResolveError> for AppError {
    fn from(err: ResolveError) -> Self {
        let message = err.message().to_string();
        match err.status_code() {
            400 => Self::BadRequest(message),
            404 => Self::NotFound(message),
            _ => Self::Internal(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            Self::NotFound(m) => (StatusCode::NOT_FOUND, m),
            Self::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Boundary for panics escaping a handler: log the payload and answer with a
/// generic 500.
pub fn panic_response(payload: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    };
    tracing::error!(detail = %detail, "Request handler panicked");
    AppError::Internal(INTERNAL_ERROR_MESSAGE.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_errors_map_to_statuses() {
        let cases = [
            (ResolveError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST),
            (ResolveError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (
                ResolveError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code(), status.as_u16());
            let resp = AppError::from(err).into_response();
            assert_eq!(resp.status(), status);
        }
    }

    #[test]
    fn panic_payload_becomes_500() {
        let resp = panic_response(Box::new("exploded"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let resp = panic_response(Box::new(String::from("exploded")));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let resp = panic_response(Box::new(17_u32));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
