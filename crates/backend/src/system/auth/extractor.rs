use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

/// Идентификатор вызывающей системы из заголовка `x-client-id`
/// Usage in handlers: `async fn handler(ClientId(client): ClientId) -> Response`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientId
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Extract ClientId from request extensions (set by middleware)
        parts
            .extensions
            .get::<ClientId>()
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
