//! HTTP adapter for the MyBooks REST API

pub mod auth;
pub mod books;
pub mod health;
pub mod libraries;
pub mod loans;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        request::Parts,
        HeaderMap, HeaderValue, Method,
    },
    routing::{get, post, put},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::CorsConfig,
    error::AppError,
    models::user::User,
    services::auth::GateError,
    AppState,
};

/// Name of the session cookie
pub const AUTH_COOKIE: &str = "access_token";

/// Extractor for the user behind the request's session token.
///
/// Any failure rejects the request with a bare 401.
pub struct AuthenticatedUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            tracing::debug!(stage = "token", "Request rejected by auth gate");
            return Err(AppError::unauthorized());
        };

        match state.services.auth.authenticate(&token).await {
            Ok(user) => Ok(AuthenticatedUser(user)),
            Err(GateError::Rejected(stage)) => {
                tracing::debug!(%stage, "Request rejected by auth gate");
                Err(AppError::unauthorized())
            }
            Err(GateError::Failed(e)) => {
                tracing::error!("User lookup failed in auth gate: {}", e);
                Err(AppError::unauthorized())
            }
        }
    }
}

/// `Path` whose rejection is an [`AppError`] body
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// `Query` whose rejection is an [`AppError`] body
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Session token from the auth cookie, or else from an `Authorization: Bearer` header
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(AUTH_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    let api_v1 = Router::new()
        // Health
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/signup/credentials", post(auth::signup))
        .route("/auth/signin/credentials", post(auth::signin))
        .route("/auth/signout", post(auth::signout))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password/:token", post(auth::reset_password))
        .route("/auth/validate-token", get(auth::validate_token))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:bookId",
            get(books::get_book).put(books::update_book).delete(books::delete_book),
        )
        .route("/books/:bookId/read", put(books::mark_read).delete(books::mark_unread))
        // Libraries
        .route("/libraries", get(libraries::list_libraries).post(libraries::create_library))
        .route(
            "/libraries/:libraryId",
            get(libraries::get_library)
                .put(libraries::update_library)
                .delete(libraries::delete_library),
        )
        .route(
            "/libraries/:libraryId/books/:bookId",
            post(libraries::add_book).delete(libraries::remove_book),
        )
        // Loans
        .route("/loans", get(loans::list_loans).post(loans::create_loan))
        .route("/loans/:loanId", get(loans::get_loan))
        .route("/loans/:loanId/return", put(loans::return_loan))
        .with_state(state);

    Router::new()
        .nest("/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}
