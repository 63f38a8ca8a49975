use crate::application::auth::token_service::TokenService;
use crate::domain::accounts::{Account, AccountRepository};
use crate::domain::auth::TokenPair;
use crate::domain::password::PasswordHashingService;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "alice")]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    fn identifiers(&self) -> (Option<&str>, Option<&str>) {
        (present(&self.username), present(&self.email))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub struct LoginResponse {
    pub account: Account,
    pub tokens: TokenPair,
}

pub struct LoginUseCase {
    accounts: Arc<dyn AccountRepository>,
    password_service: Arc<dyn PasswordHashingService>,
    token_service: Arc<TokenService>,
}

impl LoginUseCase {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        password_service: Arc<dyn PasswordHashingService>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            accounts,
            password_service,
            token_service,
        }
    }

    #[tracing::instrument(skip(self, req), fields(username = ?req.username, email = ?req.email))]
    pub async fn execute(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let (username, email) = req.identifiers();
        if username.is_none() && email.is_none() {
            return Err(AppError::ValidationError(
                "Username or email is required".to_string(),
            ));
        }

        let account = self
            .accounts
            .find_by_handle_or_email(username, email)
            .await
            .map_err(|e| {
                tracing::error!("Database error finding account: {}", e);
                AppError::InternalServerError(e)
            })?
            .ok_or_else(|| {
                tracing::warn!("Login attempt for unknown account");
                AppError::NotFound("User does not exist".to_string())
            })?;

        let valid_password = self
            .password_service
            .verify_password(&req.password, &account.password_hash)
            .map_err(AppError::InternalServerError)?;

        if !valid_password {
            tracing::warn!("Password verification failed for account {}", account.id);
            return Err(AppError::AuthError("Password is incorrect".to_string()));
        }

        let tokens = self.token_service.issue_pair(account.id).await?;

        Ok(LoginResponse { account, tokens })
    }
}
