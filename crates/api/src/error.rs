use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gateway::UpstreamError;
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    /// Primary-resource failure: the upstream status is passed through.
    Upstream(u16),
    /// Transport or decode failure reaching upstream.
    BadGateway(String),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            // The gateway and axum sit on different `http` major versions,
            // so the status crosses the seam as a bare u16.
            UpstreamError::Status { status, .. } => Self::Upstream(status.as_u16()),
            other => Self::BadGateway(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Upstream(code) => (
                StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY),
                "upstream request failed".to_string(),
            ),
            ApiError::BadGateway(msg) => {
                tracing::error!(error = %msg, "upstream unreachable");
                (StatusCode::BAD_GATEWAY, msg)
            }
        };
        let body = Json(ErrorBody { error: message });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
