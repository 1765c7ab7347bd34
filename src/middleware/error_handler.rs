use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::Response,
};
use tracing::error;

// 日志只截取响应体前 4KB，响应本身原样返回
const MAX_LOGGED_BODY: usize = 4096;

/// Logs every 5xx response together with the request line and body.
pub async fn log_errors(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;

    if !response.status().is_server_error() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            error!(%method, %uri, status = %parts.status, "Unreadable error response body: {}", e);
            parts.headers.remove(CONTENT_LENGTH);
            return Response::from_parts(parts, Body::empty());
        }
    };

    let logged = &bytes[..bytes.len().min(MAX_LOGGED_BODY)];
    error!(
        %method,
        %uri,
        status = %parts.status,
        body_len = bytes.len(),
        "Server error: {}",
        String::from_utf8_lossy(logged)
    );

    Response::from_parts(parts, Body::from(bytes))
}
