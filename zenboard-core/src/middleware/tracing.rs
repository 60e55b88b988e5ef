use axum::http::{HeaderMap, HeaderValue};
use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn incoming_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned)
}

/// Propagate an incoming request id or mint one, and echo it on the
/// response so clients can correlate their logs with ours.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id =
        incoming_request_id(req.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());

    // A minted uuid always round-trips; only a caller-supplied id can
    // carry bytes that are invalid in a header, and those are dropped.
    match HeaderValue::from_str(&request_id) {
        Ok(value) => {
            req.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
            let mut response = next.run(req).await;
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
            response
        }
        Err(_) => next.run(req).await,
    }
}
