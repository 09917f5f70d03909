use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Request logging middleware that logs all incoming requests and responses.
pub async fn request_logger_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Incoming request"
    );

    let response = next.run(request).await;

    let status = response.status();
    let duration = start.elapsed();

    match status {
        status if status.is_success() => {
            info!(
                request_id = %request_id,
                method = %method,
                uri = %uri,
                status = %status,
                duration_ms = %duration.as_millis(),
                "Request completed successfully"
            );
        }
        status if status.is_client_error() => {
            warn!(
                request_id = %request_id,
                method = %method,
                uri = %uri,
                status = %status,
                duration_ms = %duration.as_millis(),
                "Request failed with client error"
            );
        }
        status if status.is_server_error() => {
            error!(
                request_id = %request_id,
                method = %method,
                uri = %uri,
                status = %status,
                duration_ms = %duration.as_millis(),
                "Request failed with server error"
            );
        }
        _ => {
            debug!(
                request_id = %request_id,
                method = %method,
                uri = %uri,
                status = %status,
                duration_ms = %duration.as_millis(),
                "Request completed"
            );
        }
    }

    // Add request ID to response headers for tracing
    let (mut parts, body) = response.into_parts();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        parts.headers.insert("X-Request-ID", value);
    }

    Response::from_parts(parts, body)
}

/// Authentication attempt logging middleware for the auth route groups.
pub async fn auth_logger_middleware(request: Request, next: Next) -> Response {
    let uri = request.uri().clone();
    let method = request.method().clone();

    info!(
        method = %method,
        uri = %uri,
        "Authentication attempt"
    );

    let response = next.run(request).await;
    let status = response.status();

    match status {
        StatusCode::OK | StatusCode::CREATED => {
            info!(
                uri = %uri,
                status = %status,
                "Authentication successful"
            );
        }
        StatusCode::UNAUTHORIZED => {
            warn!(
                uri = %uri,
                status = %status,
                "Authentication failed - invalid credentials"
            );
        }
        StatusCode::FORBIDDEN => {
            warn!(
                uri = %uri,
                status = %status,
                "Authentication failed - access denied"
            );
        }
        status if status.is_client_error() => {
            // 400 Bad Request etc. are validation errors, not auth errors
            debug!(
                uri = %uri,
                status = %status,
                "Request rejected (client error)"
            );
        }
        _ => {
            error!(
                uri = %uri,
                status = %status,
                "Authentication system error"
            );
        }
    }

    response
}
