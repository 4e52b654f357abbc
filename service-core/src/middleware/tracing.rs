use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn header_value(request_id: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(request_id).ok()
}

/// Ensure every request carries an `x-request-id`, minting one when the
/// caller did not supply it, and echo it on the response so log lines and
/// client reports can be correlated.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = match req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
    {
        Some(incoming) => incoming.to_string(),
        None => Uuid::new_v4().to_string(),
    };

    if let Some(value) = header_value(&request_id) {
        req.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let mut response = next.run(req).await;
    if let Some(value) = header_value(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
