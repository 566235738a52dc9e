//! Single-use validation tokens (password reset)

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::{Field, FieldRules, Rule};

/// Lifetime of a password reset token
pub const PASSWORD_RESET_TTL_HOURS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    PasswordReset,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::PasswordReset => "password_reset",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validation token row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ValidationToken {
    pub token: String,
    pub token_type: String,
    pub valid: bool,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ValidationToken {
    pub fn password_reset(token: String, user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            token,
            token_type: TokenType::PasswordReset.as_str().to_string(),
            valid: true,
            user_id,
            expires_at: now + Duration::hours(PASSWORD_RESET_TTL_HOURS),
            created_at: now,
        }
    }

    /// A token can be consumed while it is valid and strictly before its expiry instant
    pub fn is_consumable_at(&self, now: DateTime<Utc>) -> bool {
        self.valid && now < self.expires_at
    }
}

impl FieldRules for ValidationToken {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("token", &self.token, &[Rule::Required, Rule::Max(100)]),
            Field::text("type", &self.token_type, &[Rule::Required, Rule::OneOf(&["password_reset"])]),
            Field::id("user_id", self.user_id, &[Rule::Required]),
        ]
    }
}
