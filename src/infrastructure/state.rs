use crate::application::auth::token_service::TokenService;
use crate::domain::accounts::AccountRepository;
use crate::domain::auth::AuthService;
use crate::domain::media::MediaStorage;
use crate::domain::password::PasswordHashingService;
use crate::infrastructure::config::AppConfig;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<dyn AccountRepository>,
    pub password_service: Arc<dyn PasswordHashingService>,
    pub media_storage: Arc<dyn MediaStorage>,
    pub token_service: Arc<TokenService>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        accounts: Arc<dyn AccountRepository>,
        auth_service: Arc<dyn AuthService>,
        password_service: Arc<dyn PasswordHashingService>,
        media_storage: Arc<dyn MediaStorage>,
    ) -> Self {
        let token_service = Arc::new(TokenService::new(accounts.clone(), auth_service));

        Self {
            config: Arc::new(config),
            accounts,
            password_service,
            media_storage,
            token_service,
        }
    }
}
