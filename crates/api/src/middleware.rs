use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

/// Logs method, path, status and duration for every request.
///
/// The `Authorization` header is deliberately not part of the record.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        duration_ms,
        "request completed"
    );
    response
}
