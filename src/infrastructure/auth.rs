use crate::domain::accounts::Account;
use crate::domain::auth::{
    ACCESS_TOKEN_TYPE, AccessClaims, AuthService, REFRESH_TOKEN_TYPE, RefreshClaims, TokenError,
};
use crate::domain::clock::{Clock, SystemClock};
use crate::infrastructure::config::TokenConfig;
use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use uuid::Uuid;

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// JWT Authentication Service using HS256 with separate access and refresh secrets
pub struct JwtAuthService {
    access_keys: SigningKeys,
    refresh_keys: SigningKeys,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
    clock: Arc<dyn Clock>,
}

impl JwtAuthService {
    pub fn new(config: &TokenConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &TokenConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            access_keys: SigningKeys::from_secret(&config.access_secret),
            refresh_keys: SigningKeys::from_secret(&config.refresh_secret),
            access_token_expiry: config.access_ttl,
            refresh_token_expiry: config.refresh_ttl,
            clock,
        }
    }

    /// Signature check only; expiry is compared against our own clock so the
    /// token is valid for exactly `[iat, exp)`.
    fn decode_claims<T: DeserializeOwned>(
        &self,
        token: &str,
        keys: &SigningKeys,
    ) -> Result<T, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        decode::<T>(token, &keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                TokenError::Invalid
            })
    }

    fn check_expiry(&self, exp: i64) -> Result<(), TokenError> {
        if self.clock.now() >= exp {
            return Err(TokenError::Expired);
        }
        Ok(())
    }
}

impl AuthService for JwtAuthService {
    fn generate_access_token(&self, account: &Account) -> Result<String> {
        let claims = AccessClaims::new(account, self.clock.now(), self.access_token_expiry);
        let header = Header::new(Algorithm::HS256);

        encode(&header, &claims, &self.access_keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate access token: {}", e))
    }

    fn generate_refresh_token(&self, account_id: Uuid) -> Result<String> {
        let claims = RefreshClaims::new(account_id, self.clock.now(), self.refresh_token_expiry);
        let header = Header::new(Algorithm::HS256);

        encode(&header, &claims, &self.refresh_keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate refresh token: {}", e))
    }

    fn validate_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let claims: AccessClaims = self.decode_claims(token, &self.access_keys)?;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(TokenError::Invalid);
        }
        self.check_expiry(claims.exp)?;
        Ok(claims)
    }

    fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let claims: RefreshClaims = self.decode_claims(token, &self.refresh_keys)?;
        if claims.token_type != REFRESH_TOKEN_TYPE {
            return Err(TokenError::Invalid);
        }
        self.check_expiry(claims.exp)?;
        Ok(claims)
    }

    fn access_token_expiry(&self) -> i64 {
        self.access_token_expiry
    }

    fn refresh_token_expiry(&self) -> i64 {
        self.refresh_token_expiry
    }
}
