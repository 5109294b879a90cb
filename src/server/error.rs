//! Error-to-HTTP response conversion.
//!
//! Wraps [`trackdeck_common::Error`] so route handlers can return
//! `Result<T, AppError>` and get the right status, a JSON body and a log line
//! at the level the error kind calls for.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::Level;
use trackdeck_common::Error;

/// Wrapper so we can implement `IntoResponse` for an external type.
pub struct AppError {
    inner: Error,
    request_id: Option<String>,
}

impl AppError {
    pub fn new(inner: Error) -> Self {
        Self {
            inner,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: Option<String>) -> Self {
        self.request_id = id;
        self
    }

    fn log(&self, status: StatusCode) {
        let request_id = self.request_id.as_deref().unwrap_or("-");
        let level = self.inner.log_level();
        if level == Level::ERROR {
            tracing::error!(
                status = %status,
                request_id,
                error = %self.inner,
                "Server error in handler"
            );
        } else if level == Level::WARN {
            tracing::warn!(
                target: "trackdeck::security",
                status = %status,
                request_id,
                error = %self.inner,
                "Rejected media path"
            );
        } else {
            tracing::debug!(
                status = %status,
                request_id,
                error = %self.inner,
                "Request failed"
            );
        }
    }
}

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        self.log(status);

        let body = json!({
            "error": self.inner.to_string(),
            "code": self.inner.code(),
            "request_id": self.request_id,
        });

        let mut response = (status, axum::Json(body)).into_response();
        if let Some(size) = self.inner.unsatisfiable_size() {
            if let Ok(value) = HeaderValue::from_str(&format!("bytes */{size}")) {
                response.headers_mut().insert(header::CONTENT_RANGE, value);
            }
        }
        response
    }
}
