use crate::domain::accounts::{Account, AccountRepository};
use crate::shared::error::AppError;
use std::sync::Arc;
use uuid::Uuid;

pub struct GetAccountUseCase {
    accounts: Arc<dyn AccountRepository>,
}

impl GetAccountUseCase {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    pub async fn execute(&self, id: Uuid) -> Result<Account, AppError> {
        self.accounts
            .find_by_id(id)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
