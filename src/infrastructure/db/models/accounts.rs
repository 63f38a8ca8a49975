use crate::domain::accounts::Account;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct AccountDbModel {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub password_hash: String,
    pub refresh_token_hash: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<AccountDbModel> for Account {
    fn from(model: AccountDbModel) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            full_name: model.full_name,
            avatar: model.avatar,
            cover_image: model.cover_image,
            password_hash: model.password_hash,
            refresh_token_hash: model.refresh_token_hash,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
