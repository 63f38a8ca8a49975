use crate::domain::accounts::{Account, AccountIdentity};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const ACCESS_TOKEN_TYPE: &str = "access";
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Claims carried by a short-lived access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Subject (account ID)
    pub sub: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub iat: i64,
    pub exp: i64,
    /// Unique token ID, keeps tokens minted in the same second distinct
    pub jti: String,
    #[serde(rename = "type")]
    pub token_type: String,
}

impl AccessClaims {
    pub fn new(account: &Account, issued_at: i64, expiry_seconds: i64) -> Self {
        Self {
            sub: account.id.to_string(),
            username: account.username.clone(),
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            iat: issued_at,
            exp: issued_at + expiry_seconds,
            jti: Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        }
    }

    pub fn identity(&self) -> Result<AccountIdentity, TokenError> {
        Ok(AccountIdentity {
            id: parse_subject(&self.sub)?,
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
        })
    }
}

/// Claims carried by a long-lived refresh token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    #[serde(rename = "type")]
    pub token_type: String,
}

impl RefreshClaims {
    pub fn new(account_id: Uuid, issued_at: i64, expiry_seconds: i64) -> Self {
        Self {
            sub: account_id.to_string(),
            iat: issued_at,
            exp: issued_at + expiry_seconds,
            jti: Uuid::new_v4().to_string(),
            token_type: REFRESH_TOKEN_TYPE.to_string(),
        }
    }

    pub fn account_id(&self) -> Result<Uuid, TokenError> {
        parse_subject(&self.sub)
    }
}

fn parse_subject(sub: &str) -> Result<Uuid, TokenError> {
    Uuid::parse_str(sub).map_err(|_| TokenError::Invalid)
}

/// Why a presented token was refused. Carries no signature internals.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is invalid or malformed")]
    Invalid,
    #[error("token has expired")]
    Expired,
}

/// A freshly minted access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

/// JWT signing and verification
pub trait AuthService: Send + Sync {
    fn generate_access_token(&self, account: &Account) -> Result<String>;

    fn generate_refresh_token(&self, account_id: Uuid) -> Result<String>;

    fn validate_access_token(&self, token: &str) -> Result<AccessClaims, TokenError>;

    fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenError>;

    fn access_token_expiry(&self) -> i64;

    fn refresh_token_expiry(&self) -> i64;
}
