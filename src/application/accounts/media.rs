use crate::domain::accounts::{Account, AccountRepository, UpdateAccount};
use crate::domain::media::MediaStorage;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Avatar,
    CoverImage,
}

impl MediaKind {
    fn label(self) -> &'static str {
        match self {
            MediaKind::Avatar => "Avatar",
            MediaKind::CoverImage => "Cover image",
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvatarRequest {
    #[schema(example = "https://cdn.example.com/avatars/alice-2.png")]
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoverImageRequest {
    #[schema(example = "https://cdn.example.com/covers/alice-2.png")]
    pub cover_image: Option<String>,
}

/// Stores a new avatar or cover image and points the account at it.
pub struct UpdateMediaUseCase {
    accounts: Arc<dyn AccountRepository>,
    media_storage: Arc<dyn MediaStorage>,
}

impl UpdateMediaUseCase {
    pub fn new(accounts: Arc<dyn AccountRepository>, media_storage: Arc<dyn MediaStorage>) -> Self {
        Self {
            accounts,
            media_storage,
        }
    }

    #[tracing::instrument(skip(self, reference))]
    pub async fn execute(
        &self,
        id: Uuid,
        kind: MediaKind,
        reference: Option<&str>,
    ) -> Result<Account, AppError> {
        let reference = reference
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AppError::ValidationError(format!("{} file is missing", kind.label()))
            })?;

        let stored = self.media_storage.upload(reference).await.map_err(|e| {
            tracing::warn!("{} upload failed: {}", kind.label(), e);
            AppError::UploadError(format!(
                "Error while uploading the {}",
                kind.label().to_lowercase()
            ))
        })?;

        let update = match kind {
            MediaKind::Avatar => UpdateAccount {
                avatar: Some(stored.url),
                ..Default::default()
            },
            MediaKind::CoverImage => UpdateAccount {
                cover_image: Some(stored.url),
                ..Default::default()
            },
        };

        self.accounts
            .update_details(id, update)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
