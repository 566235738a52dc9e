//! User model, credentials payloads and JWT claims

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::validation::{Field, FieldRules, Rule};

/// Full user model from database
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Public projection of a user, as returned by token validation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Sign-up and sign-in request
#[derive(Debug, Deserialize, ToSchema)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl FieldRules for Credentials {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("email", &self.email, &[Rule::Required, Rule::Max(100), Rule::Email]),
            Field::text("password", &self.password, &[Rule::Required, Rule::Max(100)]),
        ]
    }
}

/// Forgot password request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ForgotPassword {
    #[serde(default)]
    pub email: String,
}

impl FieldRules for ForgotPassword {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![Field::text("email", &self.email, &[Rule::Required, Rule::Email])]
    }
}

/// Reset password request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetPassword {
    #[serde(default)]
    pub password: String,
}

impl FieldRules for ResetPassword {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![Field::text("password", &self.password, &[Rule::Required, Rule::Max(100)])]
    }
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// User id
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn new(user_id: Uuid, lifetime_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            exp: now + lifetime_hours as i64 * 3600,
            iat: now,
        }
    }

    /// Create a new HS256-signed JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Verify the signature and algorithm of a token and return its claims.
    ///
    /// Only HS256 is accepted and both `exp` and `sub` must be present.
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?;
        Ok(token_data.claims)
    }

    /// Expiry is exclusive: a token is no longer valid at its `exp` second
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }

    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}
