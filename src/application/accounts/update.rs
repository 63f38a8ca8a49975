use crate::domain::accounts::{Account, AccountRepository, UpdateAccount};
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1, message = "Full name cannot be empty"))]
    #[schema(example = "Alice Anderson")]
    pub full_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
}

pub struct UpdateAccountUseCase {
    accounts: Arc<dyn AccountRepository>,
}

impl UpdateAccountUseCase {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn execute(&self, id: Uuid, req: UpdateAccountRequest) -> Result<Account, AppError> {
        if req.full_name.is_none() && req.email.is_none() {
            return Err(AppError::ValidationError(
                "Full name or email is required".to_string(),
            ));
        }

        let update = UpdateAccount {
            full_name: req.full_name,
            email: req.email,
            ..Default::default()
        };

        self.accounts
            .update_details(id, update)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
