//! Validation tokens repository

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::token::{TokenType, ValidationToken},
};

/// Outcome of an attempt to consume a password reset token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumption {
    /// No token with that value and type
    Missing,
    /// Token exists but was already used or has expired; it is now invalid
    Rejected,
    /// Token invalidated and password replaced
    Consumed,
}

#[derive(Clone)]
pub struct TokensRepository {
    pool: Pool<Postgres>,
}

impl TokensRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, token: &ValidationToken) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO validation_tokens (token, token_type, valid, user_id, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&token.token)
        .bind(&token.token_type)
        .bind(token.valid)
        .bind(token.user_id)
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get(&self, token: &str) -> AppResult<Option<ValidationToken>> {
        let row = sqlx::query_as::<_, ValidationToken>(
            "SELECT * FROM validation_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Mark a token as used. Only `valid` changes; repeated calls are no-ops.
    pub async fn invalidate(&self, token: &str) -> AppResult<()> {
        sqlx::query("UPDATE validation_tokens SET valid = FALSE WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Consume a password reset token and set the owner's new password hash.
    ///
    /// The token row is locked for the duration of the transaction, so two
    /// concurrent resets with the same token cannot both succeed.
    pub async fn consume_password_reset(
        &self,
        token: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Consumption> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ValidationToken>(
            "SELECT * FROM validation_tokens WHERE token = $1 AND token_type = $2 FOR UPDATE",
        )
        .bind(token)
        .bind(TokenType::PasswordReset.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(Consumption::Missing);
        };

        sqlx::query("UPDATE validation_tokens SET valid = FALSE WHERE token = $1")
            .bind(&row.token)
            .execute(&mut *tx)
            .await?;

        if !row.is_consumable_at(now) {
            tx.commit().await?;
            return Ok(Consumption::Rejected);
        }

        let updated = sqlx::query(
            "UPDATE users SET password = $1, updated_at = $2 WHERE id = $3 AND deleted_at IS NULL",
        )
        .bind(password_hash)
        .bind(now)
        .bind(row.user_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            // Owner is gone; the token still becomes unusable
            tx.commit().await?;
            return Ok(Consumption::Rejected);
        }

        tx.commit().await?;
        Ok(Consumption::Consumed)
    }
}
