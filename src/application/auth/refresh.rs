use crate::application::auth::token_service::TokenService;
use crate::domain::auth::TokenPair;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Body form of the refresh call; the `refreshToken` cookie takes precedence.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

pub struct RefreshTokenUseCase {
    token_service: Arc<TokenService>,
}

impl RefreshTokenUseCase {
    pub fn new(token_service: Arc<TokenService>) -> Self {
        Self { token_service }
    }

    pub async fn execute(&self, refresh_token: Option<&str>) -> Result<TokenPair, AppError> {
        let token = refresh_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Unauthorized request".to_string()))?;

        self.token_service.rotate(token).await
    }
}
