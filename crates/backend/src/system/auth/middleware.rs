use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};

use super::extractor::ClientId;

/// Заголовок с идентификатором вызывающей системы
pub const CLIENT_ID_HEADER: &str = "x-client-id";

/// Middleware that requires the caller to identify itself
pub async fn require_client_id(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let client_id = req
        .headers()
        .get(CLIENT_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(StatusCode::UNAUTHORIZED)?
        .to_string();

    // Add client id to request extensions for use in handlers
    req.extensions_mut().insert(ClientId(client_id));

    Ok(next.run(req).await)
}
