use crate::domain::accounts::{Account, AccountRepository, NewAccount};
use crate::domain::media::MediaStorage;
use crate::domain::password::PasswordHashingService;
use crate::shared::error::AppError;
use crate::shared::validation::not_blank;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAccountRequest {
    #[validate(
        custom(function = "not_blank"),
        length(min = 3, max = 30, message = "Username must be 3 to 30 characters")
    )]
    #[schema(example = "alice", min_length = 3, max_length = 30)]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alice@example.com")]
    pub email: String,

    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Alice Anderson")]
    pub full_name: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "secret123", min_length = 6)]
    pub password: String,

    /// Reference to the avatar in the media store
    #[schema(example = "https://cdn.example.com/avatars/alice.png")]
    pub avatar: Option<String>,

    #[schema(example = "https://cdn.example.com/covers/alice.png")]
    pub cover_image: Option<String>,
}

impl RegisterAccountRequest {
    /// Fast path for duplicates; the store's unique constraint settles races.
    pub async fn validate_unique_identity(
        &self,
        repo: &Arc<dyn AccountRepository>,
    ) -> Result<(), AppError> {
        let existing = repo
            .find_by_handle_or_email(Some(&self.username), Some(&self.email))
            .await
            .map_err(AppError::InternalServerError)?;

        if existing.is_some() {
            return Err(AppError::Conflict(
                "User with email or username already exists".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct RegisterAccountUseCase {
    accounts: Arc<dyn AccountRepository>,
    password_hasher: Arc<dyn PasswordHashingService>,
    media_storage: Arc<dyn MediaStorage>,
}

impl RegisterAccountUseCase {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        password_hasher: Arc<dyn PasswordHashingService>,
        media_storage: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            accounts,
            password_hasher,
            media_storage,
        }
    }

    #[tracing::instrument(skip(self, req), fields(username = %req.username))]
    pub async fn execute(&self, req: RegisterAccountRequest) -> Result<Account, AppError> {
        let avatar_ref = req
            .avatar
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::ValidationError("Avatar file is required".to_string()))?;

        req.validate_unique_identity(&self.accounts).await?;

        let avatar = self.media_storage.upload(avatar_ref).await.map_err(|e| {
            tracing::warn!("Avatar upload failed: {}", e);
            AppError::UploadError("Avatar upload failed".to_string())
        })?;

        let cover_image = match req.cover_image.as_deref().map(str::trim) {
            Some(reference) if !reference.is_empty() => Some(
                self.media_storage
                    .upload(reference)
                    .await
                    .map_err(|e| {
                        tracing::warn!("Cover image upload failed: {}", e);
                        AppError::UploadError("Cover image upload failed".to_string())
                    })?
                    .url,
            ),
            _ => None,
        };

        let password_hash = self
            .password_hasher
            .hash_password(&req.password)
            .map_err(AppError::InternalServerError)?;

        let account = self
            .accounts
            .create(NewAccount {
                username: req.username,
                email: req.email,
                full_name: req.full_name,
                avatar: avatar.url,
                cover_image,
                password_hash,
            })
            .await?;

        tracing::info!("Registered account {}", account.id);
        Ok(account)
    }
}
