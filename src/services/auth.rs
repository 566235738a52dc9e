//! Authentication: sign-up, sign-in, token resolution and password reset

use chrono::Utc;
use uuid::Uuid;

use super::{
    credentials::{generate_id, generate_secure_token, hash_password, verify_password},
    email::EmailService,
};
use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        token::ValidationToken,
        user::{Credentials, ForgotPassword, ResetPassword, User, UserClaims},
    },
    repository::{tokens::Consumption, Repository},
    validation::validate,
};

const INVALID_CREDENTIALS: &str = "invalid email or password";
const INVALID_TOKEN: &str = "invalid or expired token";

/// Where the authentication gate rejected a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStage {
    /// Signature, algorithm or structure
    Parse,
    /// Expiry claim
    Claims,
    /// Subject does not name a live user
    Resolve,
}

impl std::fmt::Display for GateStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stage = match self {
            GateStage::Parse => "parse",
            GateStage::Claims => "claims",
            GateStage::Resolve => "resolve",
        };
        f.write_str(stage)
    }
}

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    email: EmailService,
    app_url: String,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig, email: EmailService, app_url: String) -> Self {
        Self {
            repository,
            config,
            email,
            app_url,
        }
    }

    /// Lifetime of issued session tokens, in seconds
    pub fn session_seconds(&self) -> i64 {
        self.config.jwt_expiration_hours as i64 * 3600
    }

    /// Register a new user and return its id
    pub async fn signup(&self, request: Credentials) -> AppResult<Uuid> {
        validate(&request)?;

        let now = Utc::now();
        let user = User {
            id: generate_id(),
            email: request.email,
            password: hash_password(&request.password)?,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let user = self.repository.users.create(&user).await?;
        tracing::info!(user_id = %user.id, "User signed up");
        Ok(user.id)
    }

    /// Check credentials and issue a session token
    pub async fn signin(&self, request: Credentials) -> AppResult<String> {
        validate(&request)?;

        let user = self
            .repository
            .users
            .get_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&request.password, &user.password)? {
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        UserClaims::new(user.id, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Resolve a session token to its user.
    ///
    /// Errors carry the stage that failed; callers must not expose it.
    pub async fn authenticate(&self, token: &str) -> Result<User, GateError> {
        let claims = UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
                | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_) => GateError::Rejected(GateStage::Claims),
                _ => GateError::Rejected(GateStage::Parse),
            })?;

        if claims.is_expired_at(Utc::now().timestamp()) {
            return Err(GateError::Rejected(GateStage::Claims));
        }

        let user_id = claims.user_id().ok_or(GateError::Rejected(GateStage::Resolve))?;

        self.repository
            .users
            .get_by_id(user_id)
            .await
            .map_err(GateError::Failed)?
            .ok_or(GateError::Rejected(GateStage::Resolve))
    }

    /// Email a reset link when the address belongs to a user.
    ///
    /// Unknown addresses succeed silently.
    pub async fn forgot_password(&self, request: ForgotPassword) -> AppResult<()> {
        validate(&request)?;

        let Some(user) = self.repository.users.get_by_email(&request.email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = ValidationToken::password_reset(generate_secure_token(), user.id, Utc::now());
        validate(&token)?;
        self.repository.tokens.create(&token).await?;

        let reset_url = format!("{}/reset-password/{}", self.app_url.trim_end_matches('/'), token.token);
        self.email.send_password_reset(&user.email, &reset_url).await?;

        tracing::info!(user_id = %user.id, "Password reset issued");
        Ok(())
    }

    /// Set a new password using a reset token
    pub async fn reset_password(&self, token: &str, request: ResetPassword) -> AppResult<()> {
        validate(&request)?;

        let now = Utc::now();
        let stored = self
            .repository
            .tokens
            .get(token)
            .await?
            .ok_or_else(|| AppError::BadRequest(INVALID_TOKEN.to_string()))?;

        if !stored.is_consumable_at(now) {
            self.repository.tokens.invalidate(&stored.token).await?;
            return Err(AppError::BadRequest(INVALID_TOKEN.to_string()));
        }

        let password_hash = hash_password(&request.password)?;

        match self
            .repository
            .tokens
            .consume_password_reset(token, &password_hash, Utc::now())
            .await?
        {
            Consumption::Consumed => {
                tracing::info!(user_id = %stored.user_id, "Password reset completed");
                Ok(())
            }
            Consumption::Missing | Consumption::Rejected => {
                Err(AppError::BadRequest(INVALID_TOKEN.to_string()))
            }
        }
    }
}

/// Failure of the authentication gate
#[derive(Debug)]
pub enum GateError {
    /// The credential was refused at the given stage
    Rejected(GateStage),
    /// The user lookup itself failed
    Failed(AppError),
}
