use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// A registered channel owner.
///
/// `password_hash` and `refresh_token_hash` never leave the process: they are
/// skipped on serialization and absent from every response resource.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(skip)]
    pub refresh_token_hash: Option<String>,
    #[serde(with = "time::serde::iso8601")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::iso8601")]
    pub updated_at: OffsetDateTime,
}

/// Identity resolved from a verified access token and attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIdentity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
}

impl From<&Account> for AccountIdentity {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            full_name: account.full_name.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
}

/// Handles and emails are unique regardless of case.
pub fn normalize_handle(value: &str) -> String {
    value.trim().to_lowercase()
}

#[derive(Debug, Error)]
pub enum AccountStoreError {
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Persistence contract the session core depends on.
///
/// Any engine satisfying it is interchangeable. The refresh-token digest is the
/// only mutable field shared between concurrent requests; it is written by
/// `update_refresh_token` (login, logout) and `replace_refresh_token` (rotation).
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Matches either identifier. Inputs are normalized by the engine.
    async fn find_by_handle_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<Account>, anyhow::Error>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, anyhow::Error>;

    /// Fails with `AccountStoreError::Conflict` when the username or email is taken.
    async fn create(&self, new_account: NewAccount) -> Result<Account, AccountStoreError>;

    /// Unconditionally overwrites (or clears) the stored refresh-token digest.
    /// Returns `false` when the account does not exist.
    async fn update_refresh_token(
        &self,
        id: Uuid,
        token_hash: Option<&str>,
    ) -> Result<bool, anyhow::Error>;

    /// Compare-and-swap of the refresh-token digest. Succeeds only if the stored
    /// value still equals `expected`.
    async fn replace_refresh_token(
        &self,
        id: Uuid,
        expected: &str,
        token_hash: &str,
    ) -> Result<bool, anyhow::Error>;

    async fn update_details(
        &self,
        id: Uuid,
        update: UpdateAccount,
    ) -> Result<Option<Account>, AccountStoreError>;

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, anyhow::Error>;

    /// Connectivity probe used by the health endpoint.
    async fn ping(&self) -> Result<(), anyhow::Error>;
}
