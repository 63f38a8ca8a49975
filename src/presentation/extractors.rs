use crate::domain::accounts::AccountIdentity;
use crate::domain::auth::TokenError;
use crate::infrastructure::state::AppState;
use crate::presentation::cookies::{ACCESS_COOKIE_NAME, get_cookie};
use crate::shared::error::AppError;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

/// Authenticated account resolved from the access token.
///
/// The token is read from the `accessToken` cookie, falling back to an
/// `Authorization: Bearer` header. Verification is stateless; the account is
/// then loaded so that deleted accounts are turned away.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: AccountIdentity,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by the session middleware
        if let Some(identity) = parts.extensions.get::<AccountIdentity>() {
            return Ok(AuthUser {
                identity: identity.clone(),
            });
        }

        let token = get_cookie(&parts.headers, ACCESS_COOKIE_NAME)
            .or_else(|| bearer_token(parts))
            .ok_or_else(|| AppError::Unauthorized("No credential supplied".to_string()))?;

        let claimed = state.token_service.verify_access(token).map_err(|e| {
            AppError::Unauthorized(match e {
                TokenError::Expired => "Access token has expired".to_string(),
                TokenError::Invalid => "Invalid access token".to_string(),
            })
        })?;

        let account = state
            .accounts
            .find_by_id(claimed.id)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| {
                tracing::warn!("Access token for missing account {}", claimed.id);
                AppError::Unauthorized("Invalid access token".to_string())
            })?;

        Ok(AuthUser {
            identity: AccountIdentity::from(&account),
        })
    }
}
