//! Authentication endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{AuthenticatedUser, AUTH_COOKIE};
use crate::{
    error::AppResult,
    models::user::{Credentials, ForgotPassword, ResetPassword, UserInfo},
};

/// Sign-up response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    pub id: Uuid,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Token validation response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ValidateTokenResponse {
    pub user: UserInfo,
}

/// Register with email and password
#[utoipa::path(
    post,
    path = "/auth/signup/credentials",
    tag = "auth",
    request_body = Credentials,
    responses(
        (status = 201, description = "User created", body = SignupResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid payload", body = crate::error::ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<crate::AppState>,
    Json(request): Json<Credentials>,
) -> AppResult<(StatusCode, Json<SignupResponse>)> {
    let id = state.services.auth.signup(request).await?;
    Ok((StatusCode::CREATED, Json(SignupResponse { id })))
}

/// Sign in and receive the session cookie
#[utoipa::path(
    post,
    path = "/auth/signin/credentials",
    tag = "auth",
    request_body = Credentials,
    responses(
        (status = 200, description = "Signed in, session cookie set"),
        (status = 401, description = "Invalid email or password", body = crate::error::ErrorResponse)
    )
)]
pub async fn signin(
    State(state): State<crate::AppState>,
    jar: CookieJar,
    Json(request): Json<Credentials>,
) -> AppResult<(CookieJar, StatusCode)> {
    let token = state.services.auth.signin(request).await?;

    let cookie = Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.auth.cookie_secure)
        .max_age(time::Duration::seconds(state.services.auth.session_seconds()));

    Ok((jar.add(cookie), StatusCode::OK))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/auth/signout",
    tag = "auth",
    responses(
        (status = 200, description = "Session cookie cleared")
    )
)]
pub async fn signout(State(state): State<crate::AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let cookie = Cookie::build((AUTH_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.auth.cookie_secure)
        .max_age(time::Duration::ZERO);

    (jar.add(cookie), StatusCode::OK)
}

/// Request a password reset email
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    tag = "auth",
    request_body = ForgotPassword,
    responses(
        (status = 200, description = "Accepted, whether or not the email is registered", body = MessageResponse),
        (status = 422, description = "Invalid email", body = crate::error::ErrorResponse)
    )
)]
pub async fn forgot_password(
    State(state): State<crate::AppState>,
    Json(request): Json<ForgotPassword>,
) -> AppResult<Json<MessageResponse>> {
    state.services.auth.forgot_password(request).await?;
    Ok(MessageResponse::new("email sent"))
}

/// Set a new password with a reset token
#[utoipa::path(
    post,
    path = "/auth/reset-password/{token}",
    tag = "auth",
    params(("token" = String, Path, description = "Password reset token")),
    request_body = ResetPassword,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Invalid or expired token", body = crate::error::ErrorResponse)
    )
)]
pub async fn reset_password(
    State(state): State<crate::AppState>,
    Path(token): Path<String>,
    Json(request): Json<ResetPassword>,
) -> AppResult<Json<MessageResponse>> {
    state.services.auth.reset_password(&token, request).await?;
    Ok(MessageResponse::new("password reset successful"))
}

/// Return the user behind the session token
#[utoipa::path(
    get,
    path = "/auth/validate-token",
    tag = "auth",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token is valid", body = ValidateTokenResponse),
        (status = 401, description = "Missing, invalid or expired token", body = crate::error::ErrorResponse)
    )
)]
pub async fn validate_token(AuthenticatedUser(user): AuthenticatedUser) -> Json<ValidateTokenResponse> {
    Json(ValidateTokenResponse {
        user: UserInfo::from(&user),
    })
}
