use crate::presentation::extractors::AuthUser;
use axum::{extract::Request, middleware::Next, response::Response};

/// Rejects the request unless it carries a valid access token, then attaches
/// the resolved `AccountIdentity` to the request extensions.
pub async fn require_session(auth_user: AuthUser, mut request: Request, next: Next) -> Response {
    tracing::debug!("Authenticated account {}", auth_user.identity.id);
    request.extensions_mut().insert(auth_user.identity);
    next.run(request).await
}
