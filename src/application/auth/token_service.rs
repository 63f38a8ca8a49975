use crate::domain::accounts::{Account, AccountIdentity, AccountRepository};
use crate::domain::auth::{AuthService, TokenError, TokenPair};
use crate::shared::error::AppError;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

/// SHA-256 hex digest of a token; the only form in which refresh tokens are stored.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Issues, verifies and rotates session tokens.
///
/// Each account has at most one live refresh token: the one whose digest is
/// stored on the account. Issuing a new pair overwrites it; rotating swaps it
/// only if it is still the presented one.
pub struct TokenService {
    accounts: Arc<dyn AccountRepository>,
    auth_service: Arc<dyn AuthService>,
}

impl TokenService {
    pub fn new(accounts: Arc<dyn AccountRepository>, auth_service: Arc<dyn AuthService>) -> Self {
        Self {
            accounts,
            auth_service,
        }
    }

    pub fn access_token_expiry(&self) -> i64 {
        self.auth_service.access_token_expiry()
    }

    pub fn refresh_token_expiry(&self) -> i64 {
        self.auth_service.refresh_token_expiry()
    }

    /// Mints a pair for the account and makes its refresh token the live one.
    #[tracing::instrument(skip(self))]
    pub async fn issue_pair(&self, account_id: Uuid) -> Result<TokenPair, AppError> {
        let account = self.load_account(account_id).await?.ok_or_else(|| {
            AppError::InternalServerError(anyhow::anyhow!(
                "Account {} vanished before token issuance",
                account_id
            ))
        })?;

        let pair = self.mint_pair(&account)?;

        let stored = self
            .accounts
            .update_refresh_token(account.id, Some(&hash_token(&pair.refresh_token)))
            .await
            .map_err(AppError::InternalServerError)?;

        if !stored {
            return Err(AppError::InternalServerError(anyhow::anyhow!(
                "Account {} vanished while storing refresh token",
                account_id
            )));
        }

        tracing::info!("Issued token pair for account {}", account_id);
        Ok(pair)
    }

    /// Stateless check: signature and expiry only.
    pub fn verify_access(&self, token: &str) -> Result<AccountIdentity, TokenError> {
        let claims = self.auth_service.validate_access_token(token)?;
        claims.identity()
    }

    /// Exchanges the live refresh token for a new pair.
    #[tracing::instrument(skip_all)]
    pub async fn rotate(&self, presented: &str) -> Result<TokenPair, AppError> {
        let claims = self.auth_service.validate_refresh_token(presented)?;
        let account_id = claims.account_id()?;

        let account = self.load_account(account_id).await?.ok_or_else(|| {
            tracing::warn!("Refresh token for unknown account {}", account_id);
            AppError::InvalidToken("Refresh token does not belong to an account".to_string())
        })?;

        let presented_hash = hash_token(presented);
        if account.refresh_token_hash.as_deref() != Some(presented_hash.as_str()) {
            tracing::warn!("Stale refresh token presented for account {}", account_id);
            return Err(AppError::StaleToken);
        }

        let pair = self.mint_pair(&account)?;

        // A concurrent rotation that already replaced the digest wins; we lose.
        let swapped = self
            .accounts
            .replace_refresh_token(
                account_id,
                &presented_hash,
                &hash_token(&pair.refresh_token),
            )
            .await
            .map_err(AppError::InternalServerError)?;

        if !swapped {
            tracing::warn!("Lost refresh race for account {}", account_id);
            return Err(AppError::StaleToken);
        }

        tracing::info!("Rotated refresh token for account {}", account_id);
        Ok(pair)
    }

    /// Clears the live refresh token so it can no longer be rotated.
    #[tracing::instrument(skip(self))]
    pub async fn revoke(&self, account_id: Uuid) -> Result<(), AppError> {
        self.accounts
            .update_refresh_token(account_id, None)
            .await
            .map_err(AppError::InternalServerError)?;

        tracing::info!("Revoked refresh token for account {}", account_id);
        Ok(())
    }

    async fn load_account(&self, account_id: Uuid) -> Result<Option<Account>, AppError> {
        self.accounts
            .find_by_id(account_id)
            .await
            .map_err(AppError::InternalServerError)
    }

    fn mint_pair(&self, account: &Account) -> Result<TokenPair, AppError> {
        let access_token = self
            .auth_service
            .generate_access_token(account)
            .map_err(AppError::InternalServerError)?;

        let refresh_token = self
            .auth_service
            .generate_refresh_token(account.id)
            .map_err(AppError::InternalServerError)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.auth_service.access_token_expiry(),
            refresh_expires_in: self.auth_service.refresh_token_expiry(),
        })
    }
}
