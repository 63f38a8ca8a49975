use crate::domain::accounts::{
    Account, AccountRepository, AccountStoreError, NewAccount, UpdateAccount, normalize_handle,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use time::OffsetDateTime;
use uuid::Uuid;

/// Process-local account store.
///
/// Every operation runs under one lock, so the uniqueness checks in `create`
/// and the compare-and-swap in `replace_refresh_token` are atomic.
#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<Mutex<Vec<Account>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Account>>, anyhow::Error> {
        self.accounts
            .lock()
            .map_err(|_| anyhow::anyhow!("account store lock poisoned"))
    }
}

fn conflict_for(
    accounts: &[Account],
    username: Option<&str>,
    email: Option<&str>,
    skip: Option<Uuid>,
) -> Option<AccountStoreError> {
    let others = || accounts.iter().filter(move |a| Some(a.id) != skip);

    if let Some(username) = username {
        if others().any(|a| a.username == username) {
            return Some(AccountStoreError::Conflict(
                "Username is already taken".to_string(),
            ));
        }
    }
    if let Some(email) = email {
        if others().any(|a| a.email == email) {
            return Some(AccountStoreError::Conflict(
                "Email is already registered".to_string(),
            ));
        }
    }
    None
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_handle_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<Account>, anyhow::Error> {
        let username = username.map(normalize_handle);
        let email = email.map(normalize_handle);
        let accounts = self.lock()?;

        Ok(accounts
            .iter()
            .find(|a| {
                username.as_deref() == Some(a.username.as_str())
                    || email.as_deref() == Some(a.email.as_str())
            })
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, anyhow::Error> {
        let accounts = self.lock()?;
        Ok(accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn create(&self, new_account: NewAccount) -> Result<Account, AccountStoreError> {
        let username = normalize_handle(&new_account.username);
        let email = normalize_handle(&new_account.email);
        let mut accounts = self.lock()?;

        if let Some(conflict) = conflict_for(&accounts, Some(&username), Some(&email), None) {
            return Err(conflict);
        }

        let now = OffsetDateTime::now_utc();
        let account = Account {
            id: Uuid::new_v4(),
            username,
            email,
            full_name: new_account.full_name.trim().to_string(),
            avatar: new_account.avatar,
            cover_image: new_account.cover_image,
            password_hash: new_account.password_hash,
            refresh_token_hash: None,
            created_at: now,
            updated_at: now,
        };
        accounts.push(account.clone());
        Ok(account)
    }

    async fn update_refresh_token(
        &self,
        id: Uuid,
        token_hash: Option<&str>,
    ) -> Result<bool, anyhow::Error> {
        let mut accounts = self.lock()?;
        match accounts.iter_mut().find(|a| a.id == id) {
            Some(account) => {
                account.refresh_token_hash = token_hash.map(str::to_string);
                account.updated_at = OffsetDateTime::now_utc();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn replace_refresh_token(
        &self,
        id: Uuid,
        expected: &str,
        token_hash: &str,
    ) -> Result<bool, anyhow::Error> {
        let mut accounts = self.lock()?;
        match accounts.iter_mut().find(|a| a.id == id) {
            Some(account) if account.refresh_token_hash.as_deref() == Some(expected) => {
                account.refresh_token_hash = Some(token_hash.to_string());
                account.updated_at = OffsetDateTime::now_utc();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_details(
        &self,
        id: Uuid,
        update: UpdateAccount,
    ) -> Result<Option<Account>, AccountStoreError> {
        let email = update.email.as_deref().map(normalize_handle);
        let mut accounts = self.lock()?;

        if let Some(conflict) = conflict_for(&accounts, None, email.as_deref(), Some(id)) {
            return Err(conflict);
        }

        let Some(account) = accounts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };

        if let Some(full_name) = update.full_name {
            account.full_name = full_name.trim().to_string();
        }
        if let Some(email) = email {
            account.email = email;
        }
        if let Some(avatar) = update.avatar {
            account.avatar = avatar;
        }
        if let Some(cover_image) = update.cover_image {
            account.cover_image = Some(cover_image);
        }
        account.updated_at = OffsetDateTime::now_utc();

        Ok(Some(account.clone()))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, anyhow::Error> {
        let mut accounts = self.lock()?;
        match accounts.iter_mut().find(|a| a.id == id) {
            Some(account) => {
                account.password_hash = password_hash.to_string();
                account.updated_at = OffsetDateTime::now_utc();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), anyhow::Error> {
        self.lock().map(|_| ())
    }
}
