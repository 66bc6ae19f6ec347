use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream error: {status} for {endpoint}")]
    Status {
        status: StatusCode,
        endpoint: String,
    },
    #[error("upstream unreachable: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected upstream payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("expected an array from {endpoint}")]
    Shape { endpoint: String },
    #[error("invalid upstream url: {0}")]
    Url(#[from] url::ParseError),
}

impl UpstreamError {
    pub fn status(status: StatusCode, endpoint: impl Into<String>) -> Self {
        Self::Status {
            status,
            endpoint: endpoint.into(),
        }
    }

    /// The upstream HTTP status, when the failure was a non-success response.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
