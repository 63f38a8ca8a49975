use crate::domain::accounts::{AccountIdentity, AccountRepository};
use crate::domain::password::PasswordHashingService;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,

    pub confirm_password: String,
}

/// Replaces the password hash. The live refresh token is left alone.
pub struct ChangePasswordUseCase {
    accounts: Arc<dyn AccountRepository>,
    password_service: Arc<dyn PasswordHashingService>,
}

impl ChangePasswordUseCase {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        password_service: Arc<dyn PasswordHashingService>,
    ) -> Self {
        Self {
            accounts,
            password_service,
        }
    }

    #[tracing::instrument(skip(self, identity, req), fields(account_id = %identity.id))]
    pub async fn execute(
        &self,
        identity: &AccountIdentity,
        req: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let account = self
            .accounts
            .find_by_id(identity.id)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let old_matches = self
            .password_service
            .verify_password(&req.old_password, &account.password_hash)
            .map_err(AppError::InternalServerError)?;

        if !old_matches {
            tracing::warn!("Old password mismatch for account {}", account.id);
            return Err(AppError::AuthError(
                "Your old password is invalid".to_string(),
            ));
        }

        if req.new_password != req.confirm_password {
            return Err(AppError::ValidationError(
                "New password does not match confirm password".to_string(),
            ));
        }

        let password_hash = self
            .password_service
            .hash_password(&req.new_password)
            .map_err(AppError::InternalServerError)?;

        let updated = self
            .accounts
            .update_password(account.id, &password_hash)
            .await
            .map_err(AppError::InternalServerError)?;

        if !updated {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tracing::info!("Password changed for account {}", account.id);
        Ok(())
    }
}
