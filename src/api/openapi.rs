//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, libraries, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MyBooks API",
        version = "1.0.0",
        description = "Personal library management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::signin,
        auth::signout,
        auth::forgot_password,
        auth::reset_password,
        auth::validate_token,
        // Books
        books::list_books,
        books::create_book,
        books::get_book,
        books::update_book,
        books::delete_book,
        books::mark_read,
        books::mark_unread,
        // Libraries
        libraries::list_libraries,
        libraries::create_library,
        libraries::get_library,
        libraries::update_library,
        libraries::delete_library,
        libraries::add_book,
        libraries::remove_book,
        // Loans
        loans::create_loan,
        loans::list_loans,
        loans::get_loan,
        loans::return_loan,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::Credentials,
            crate::models::user::ForgotPassword,
            crate::models::user::ResetPassword,
            crate::models::user::UserInfo,
            auth::SignupResponse,
            auth::MessageResponse,
            auth::ValidateTokenResponse,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Libraries
            crate::models::library::Library,
            crate::models::library::LibraryDetails,
            crate::models::library::CreateLibrary,
            crate::models::library::UpdateLibrary,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::CreateLoan,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Book management"),
        (name = "libraries", description = "Library management"),
        (name = "loans", description = "Loan management")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Session cookie and bearer header schemes
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(super::AUTH_COOKIE))),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
