use crate::application::auth::token_service::TokenService;
use crate::domain::accounts::AccountIdentity;
use crate::shared::error::AppError;
use std::sync::Arc;

pub struct LogoutUseCase {
    token_service: Arc<TokenService>,
}

impl LogoutUseCase {
    pub fn new(token_service: Arc<TokenService>) -> Self {
        Self { token_service }
    }

    #[tracing::instrument(skip(self, identity), fields(account_id = %identity.id))]
    pub async fn execute(&self, identity: &AccountIdentity) -> Result<(), AppError> {
        self.token_service.revoke(identity.id).await
    }
}
