use crate::domain::accounts::{
    Account, AccountRepository, AccountStoreError, NewAccount, UpdateAccount, normalize_handle,
};
use crate::infrastructure::db::DbPool;
use crate::infrastructure::db::models::accounts::AccountDbModel;
use async_trait::async_trait;
use uuid::Uuid;

const ACCOUNT_COLUMNS: &str = "id, username, email, full_name, avatar, cover_image, \
     password_hash, refresh_token_hash, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresAccountRepository {
    pool: DbPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Unique index violations become conflicts, everything else stays opaque.
fn map_write_error(err: sqlx::Error) -> AccountStoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let message = match db_err.constraint() {
                Some("users_username_lower_idx") => "Username is already taken",
                Some("users_email_lower_idx") => "Email is already registered",
                _ => "User with email or username already exists",
            };
            return AccountStoreError::Conflict(message.to_string());
        }
    }
    AccountStoreError::Other(err.into())
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_by_handle_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<Account>, anyhow::Error> {
        if username.is_none() && email.is_none() {
            return Ok(None);
        }

        let account = sqlx::query_as::<_, AccountDbModel>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM users
            WHERE ($1::TEXT IS NOT NULL AND LOWER(username) = $1)
               OR ($2::TEXT IS NOT NULL AND LOWER(email) = $2)
            LIMIT 1
            "#
        ))
        .bind(username.map(normalize_handle))
        .bind(email.map(normalize_handle))
        .fetch_optional(&self.pool)
        .await?;

        Ok(account.map(Into::into))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, anyhow::Error> {
        let account = sqlx::query_as::<_, AccountDbModel>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account.map(Into::into))
    }

    async fn create(&self, new_account: NewAccount) -> Result<Account, AccountStoreError> {
        let account = sqlx::query_as::<_, AccountDbModel>(&format!(
            r#"
            INSERT INTO users (username, email, full_name, avatar, cover_image, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(normalize_handle(&new_account.username))
        .bind(normalize_handle(&new_account.email))
        .bind(new_account.full_name.trim())
        .bind(new_account.avatar)
        .bind(new_account.cover_image)
        .bind(new_account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(account.into())
    }

    async fn update_refresh_token(
        &self,
        id: Uuid,
        token_hash: Option<&str>,
    ) -> Result<bool, anyhow::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn replace_refresh_token(
        &self,
        id: Uuid,
        expected: &str,
        token_hash: &str,
    ) -> Result<bool, anyhow::Error> {
        // Row-level atomic: a concurrent writer makes the WHERE clause miss.
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = $3, updated_at = NOW()
            WHERE id = $1 AND refresh_token_hash = $2
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(token_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_details(
        &self,
        id: Uuid,
        update: UpdateAccount,
    ) -> Result<Option<Account>, AccountStoreError> {
        let account = sqlx::query_as::<_, AccountDbModel>(&format!(
            r#"
            UPDATE users
            SET full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                avatar = COALESCE($4, avatar),
                cover_image = COALESCE($5, cover_image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.full_name.as_deref().map(str::trim))
        .bind(update.email.as_deref().map(normalize_handle))
        .bind(update.avatar)
        .bind(update.cover_image)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(account.map(Into::into))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, anyhow::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), anyhow::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
