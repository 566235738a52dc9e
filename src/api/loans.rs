//! Loan endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{ApiPath, ApiQuery, AuthenticatedUser};
use crate::{
    error::AppResult,
    models::loan::{CreateLoan, Loan, LoanQuery},
};

/// Lend a book
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Book already borrowed", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid payload", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let loan = state.services.loans.create(user.id, request).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(LoanQuery),
    responses(
        (status = 200, description = "Loans, newest first", body = Vec<Loan>)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiQuery(query): ApiQuery<LoanQuery>,
) -> AppResult<Json<Vec<Loan>>> {
    let loans = state.services.loans.list(user.id, query).await?;
    Ok(Json(loans))
}

#[utoipa::path(
    get,
    path = "/loans/{loanId}",
    tag = "loans",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(("loanId" = Uuid, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan details", body = Loan),
        (status = 404, description = "Loan not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.get(user.id, id).await?;
    Ok(Json(loan))
}

/// Mark a loan as returned
#[utoipa::path(
    put,
    path = "/loans/{loanId}/return",
    tag = "loans",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(("loanId" = Uuid, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan returned", body = Loan),
        (status = 404, description = "Loan not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.return_loan(user.id, id).await?;
    Ok(Json(loan))
}
